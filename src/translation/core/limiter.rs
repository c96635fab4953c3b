//! 滑动窗口速率限制器
//!
//! 记录最近放行的调用时间戳，窗口内不足 `capacity` 个时放行。
//! 等待期间不持有锁，醒来后重新检查窗口，等待可以被取消。

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

use super::cancel::CancelToken;
use crate::translation::config::ProviderConfig;

/// 窗口预分配的上限，配置中的超大容量按需增长
const MAX_PREALLOCATED_SLOTS: usize = 1024;

/// 一次申请的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    Cancelled,
}

/// 速率限制器
#[derive(Debug)]
pub struct RateLimiter {
    capacity: usize,
    period: Duration,
    window: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// `capacity == 0` 表示不限制
    pub fn new(capacity: usize, period: Duration) -> Self {
        Self {
            capacity,
            period,
            window: Mutex::new(VecDeque::with_capacity(capacity.min(MAX_PREALLOCATED_SLOTS))),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(config.rate_limit_count, config.rate_limit_period)
    }

    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// 申请一次调用许可
    ///
    /// 只有放行时才记录时间戳，被取消的申请不占用窗口。
    pub async fn acquire(&self, cancel: &CancelToken) -> Admission {
        if !self.is_enabled() {
            return Admission::Admitted;
        }

        loop {
            if cancel.is_cancelled() {
                return Admission::Cancelled;
            }

            let wait = {
                let mut window = self.window.lock().await;
                let now = Instant::now();
                self.evict_expired(&mut window, now);

                if window.len() < self.capacity {
                    window.push_back(now);
                    return Admission::Admitted;
                }

                match window.front() {
                    Some(oldest) => self.period.saturating_sub(now.duration_since(*oldest)),
                    None => Duration::ZERO,
                }
            };

            tracing::debug!("达到速率限制，等待 {:.2} 秒", wait.as_secs_f64());

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!("速率限制等待期间请求被取消");
                    return Admission::Cancelled;
                }
                _ = sleep(wait) => {}
            }
        }
    }

    /// 当前窗口内的时间戳数量
    pub async fn in_flight(&self) -> usize {
        let mut window = self.window.lock().await;
        self.evict_expired(&mut window, Instant::now());
        window.len()
    }

    fn evict_expired(&self, window: &mut VecDeque<Instant>, now: Instant) {
        while let Some(oldest) = window.front() {
            if now.duration_since(*oldest) >= self.period {
                window.pop_front();
            } else {
                break;
            }
        }
    }
}
