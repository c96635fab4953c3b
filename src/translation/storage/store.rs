//! 嵌入式持久化存储
//!
//! 基于 redb 的三张独立键值表：
//!
//! | 表 | 键 | 值 |
//! |---|---|---|
//! | `translation_cache` | 内容哈希 | JSON 序列化的 [`CacheEntry`] |
//! | `word_frequency` | 单词 | 选择次数 |
//! | `word_memory` | 单词 | (等级, 抑制截止时间) |
//!
//! redb 的写事务是串行的，单个写事务内的“读取-修改-写入”对其他请求是原子的。

use std::collections::HashSet;
use std::path::Path;

use redb::backends::InMemoryBackend;
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use serde::{Deserialize, Serialize};

use crate::translation::error::TranslationResult;

const TRANSLATION_CACHE: TableDefinition<&str, &str> = TableDefinition::new("translation_cache");
const WORD_FREQUENCY: TableDefinition<&str, u64> = TableDefinition::new("word_frequency");
const WORD_MEMORY: TableDefinition<&str, (u32, i64)> = TableDefinition::new("word_memory");

/// 缓存条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub sentence: String,
    #[serde(rename = "target_word")]
    pub word: String,
    pub translation: String,
    /// 写入时间（Unix 秒）
    #[serde(rename = "timestamp")]
    pub created_at: i64,
}

/// 单词记忆状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordMemory {
    pub level: u32,
    /// 抑制截止时间（Unix 秒）
    pub suppress_until: i64,
}

/// 各表的行数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub cache_entries: u64,
    pub tracked_words: u64,
    pub remembered_words: u64,
}

/// 持久化存储
pub struct Store {
    db: Database,
}

impl Store {
    /// 打开（或创建）数据库文件
    pub fn open<P: AsRef<Path>>(path: P) -> TranslationResult<Self> {
        let db = Database::create(path.as_ref()).map_err(redb::Error::from)?;
        Self::with_database(db)
    }

    /// 创建内存数据库，进程退出后数据丢失
    pub fn in_memory() -> TranslationResult<Self> {
        let db = Database::builder()
            .create_with_backend(InMemoryBackend::new())
            .map_err(redb::Error::from)?;
        Self::with_database(db)
    }

    fn with_database(db: Database) -> TranslationResult<Self> {
        let store = Self { db };
        store.init_tables()?;
        Ok(store)
    }

    /// 确保三张表都存在，之后的读事务才能打开它们
    fn init_tables(&self) -> Result<(), redb::Error> {
        let txn = self.db.begin_write()?;
        {
            txn.open_table(TRANSLATION_CACHE)?;
            txn.open_table(WORD_FREQUENCY)?;
            txn.open_table(WORD_MEMORY)?;
        }
        txn.commit()?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // translation_cache
    // ------------------------------------------------------------------

    /// 按键读取缓存条目
    pub fn cache_entry(&self, key: &str) -> TranslationResult<Option<CacheEntry>> {
        let raw = self.read_cache_json(key)?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn read_cache_json(&self, key: &str) -> Result<Option<String>, redb::Error> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(TRANSLATION_CACHE)?;
        let value = table.get(key)?.map(|guard| guard.value().to_string());
        Ok(value)
    }

    /// 写入缓存条目，同键覆盖
    pub fn put_cache_entry(&self, entry: &CacheEntry) -> TranslationResult<()> {
        let json = serde_json::to_string(entry)?;
        self.write_cache_json(&entry.key, &json)?;
        Ok(())
    }

    fn write_cache_json(&self, key: &str, json: &str) -> Result<(), redb::Error> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(TRANSLATION_CACHE)?;
            table.insert(key, json)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// 删除缓存条目，返回条目是否存在
    pub fn delete_cache_entry(&self, key: &str) -> TranslationResult<bool> {
        Ok(self.delete_key(TRANSLATION_CACHE, key)?)
    }

    // ------------------------------------------------------------------
    // word_frequency
    // ------------------------------------------------------------------

    /// 单词被选中的次数，未出现过为 0
    pub fn frequency(&self, word: &str) -> TranslationResult<u64> {
        Ok(self.read_frequency(word)?)
    }

    fn read_frequency(&self, word: &str) -> Result<u64, redb::Error> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(WORD_FREQUENCY)?;
        let count = table.get(word)?.map(|guard| guard.value()).unwrap_or(0);
        Ok(count)
    }

    /// 计数加一（不存在则插入 1），返回新值
    pub fn increment_frequency(&self, word: &str) -> TranslationResult<u64> {
        Ok(self.write_increment(word)?)
    }

    fn write_increment(&self, word: &str) -> Result<u64, redb::Error> {
        let txn = self.db.begin_write()?;
        let updated = {
            let mut table = txn.open_table(WORD_FREQUENCY)?;
            let current = table.get(word)?.map(|guard| guard.value()).unwrap_or(0);
            let updated = current.saturating_add(1);
            table.insert(word, updated)?;
            updated
        };
        txn.commit()?;
        Ok(updated)
    }

    // ------------------------------------------------------------------
    // word_memory
    // ------------------------------------------------------------------

    /// 读取单词记忆状态
    pub fn memory(&self, word: &str) -> TranslationResult<Option<WordMemory>> {
        Ok(self.read_memory(word)?)
    }

    fn read_memory(&self, word: &str) -> Result<Option<WordMemory>, redb::Error> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(WORD_MEMORY)?;
        let memory = table.get(word)?.map(|guard| {
            let (level, suppress_until) = guard.value();
            WordMemory {
                level,
                suppress_until,
            }
        });
        Ok(memory)
    }

    /// 在一个写事务内读取旧状态并写入新状态
    pub fn update_memory<F>(&self, word: &str, update: F) -> TranslationResult<WordMemory>
    where
        F: FnOnce(Option<WordMemory>) -> WordMemory,
    {
        Ok(self.write_memory(word, update)?)
    }

    fn write_memory<F>(&self, word: &str, update: F) -> Result<WordMemory, redb::Error>
    where
        F: FnOnce(Option<WordMemory>) -> WordMemory,
    {
        let txn = self.db.begin_write()?;
        let next = {
            let mut table = txn.open_table(WORD_MEMORY)?;
            let previous = table.get(word)?.map(|guard| {
                let (level, suppress_until) = guard.value();
                WordMemory {
                    level,
                    suppress_until,
                }
            });
            let next = update(previous);
            table.insert(word, (next.level, next.suppress_until))?;
            next
        };
        txn.commit()?;
        Ok(next)
    }

    /// 删除单词记忆状态
    pub fn delete_memory(&self, word: &str) -> TranslationResult<bool> {
        Ok(self.delete_key(WORD_MEMORY, word)?)
    }

    /// 返回 `words` 中 `suppress_until > now` 的单词
    pub fn suppressed_among(&self, words: &[String], now: i64) -> TranslationResult<HashSet<String>> {
        if words.is_empty() {
            return Ok(HashSet::new());
        }
        Ok(self.read_suppressed(words, now)?)
    }

    fn read_suppressed(&self, words: &[String], now: i64) -> Result<HashSet<String>, redb::Error> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(WORD_MEMORY)?;

        let mut suppressed = HashSet::new();
        for word in words {
            if let Some(guard) = table.get(word.as_str())? {
                let (_, suppress_until) = guard.value();
                if suppress_until > now {
                    suppressed.insert(word.clone());
                }
            }
        }
        Ok(suppressed)
    }

    /// 当前仍处于抑制期的单词及其截止时间，按截止时间排序
    pub fn suppressed_words(&self, now: i64) -> TranslationResult<Vec<(String, WordMemory)>> {
        Ok(self.scan_suppressed(now)?)
    }

    fn scan_suppressed(&self, now: i64) -> Result<Vec<(String, WordMemory)>, redb::Error> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(WORD_MEMORY)?;

        let mut words = Vec::new();
        for row in table.iter()? {
            let (word, value) = row?;
            let (level, suppress_until) = value.value();
            if suppress_until > now {
                words.push((
                    word.value().to_string(),
                    WordMemory {
                        level,
                        suppress_until,
                    },
                ));
            }
        }
        words.sort_by_key(|(_, memory)| memory.suppress_until);
        Ok(words)
    }

    // ------------------------------------------------------------------
    // 通用
    // ------------------------------------------------------------------

    /// 各表行数
    pub fn stats(&self) -> TranslationResult<StoreStats> {
        Ok(self.read_stats()?)
    }

    fn read_stats(&self) -> Result<StoreStats, redb::Error> {
        let txn = self.db.begin_read()?;
        Ok(StoreStats {
            cache_entries: txn.open_table(TRANSLATION_CACHE)?.len()?,
            tracked_words: txn.open_table(WORD_FREQUENCY)?.len()?,
            remembered_words: txn.open_table(WORD_MEMORY)?.len()?,
        })
    }

    fn delete_key<V>(
        &self,
        definition: TableDefinition<'static, &'static str, V>,
        key: &str,
    ) -> Result<bool, redb::Error>
    where
        V: redb::Value + 'static,
    {
        let txn = self.db.begin_write()?;
        let existed = {
            let mut table = txn.open_table(definition)?;
            let removed = table.remove(key)?.is_some();
            removed
        };
        txn.commit()?;
        Ok(existed)
    }
}
