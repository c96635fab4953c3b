//! 协作式取消信号
//!
//! 请求方持有 [`CancelToken`]，在不再需要结果时调用 `cancel()`；
//! 执行方在等待期间通过 `cancelled()` 感知取消。

use std::sync::Arc;

use tokio::sync::watch;

/// 可克隆的取消令牌，所有克隆共享同一个状态
#[derive(Debug, Clone)]
pub struct CancelToken {
    state: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
        }
    }

    /// 发出取消信号，重复调用无副作用
    pub fn cancel(&self) {
        self.state.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.state.borrow()
    }

    /// 等待直到令牌被取消
    pub async fn cancelled(&self) {
        let mut receiver = self.state.subscribe();
        // 发送端由自身持有，wait_for 不会因通道关闭而返回错误
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }

    /// 返回一个守卫，守卫被丢弃时取消令牌
    ///
    /// Web 层把守卫放进请求 future，客户端断开导致 future 被丢弃时，
    /// 后台任务随之收到取消信号。
    pub fn drop_guard(&self) -> CancelOnDrop {
        CancelOnDrop {
            token: Some(self.clone()),
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// 丢弃时取消令牌的守卫
#[derive(Debug)]
pub struct CancelOnDrop {
    token: Option<CancelToken>,
}

impl CancelOnDrop {
    /// 解除守卫，丢弃时不再取消
    pub fn disarm(mut self) -> CancelToken {
        match self.token.take() {
            Some(token) => token,
            None => CancelToken::new(),
        }
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());

        token.cancel();
        assert!(clone.is_cancelled());
        clone.cancelled().await;
    }

    #[tokio::test]
    async fn test_cancelled_wakes_waiter() {
        let token = CancelToken::new();
        let waiter = {
            let token = token.clone();
            tokio::spawn(async move { token.cancelled().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        token.cancel();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("等待者应被唤醒")
            .unwrap();
    }

    #[test]
    fn test_drop_guard() {
        let token = CancelToken::new();
        {
            let _guard = token.drop_guard();
        }
        assert!(token.is_cancelled());

        let token = CancelToken::new();
        token.drop_guard().disarm();
        assert!(!token.is_cancelled());
    }
}
