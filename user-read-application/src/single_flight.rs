//! 在途请求合并（SingleFlight）
//!
//! 同一键上并发发起的多次解析合并为一次：第一个到达的调用方创建“航班”（flight），
//! 之后到达的调用方加入并等待同一个共享结果。
//! - 每个等待方各自响应自己的取消令牌与截止时间，提前离开不会影响其他等待方；
//! - 最后一个等待方离开时取消航班令牌并移除航班，进行中的解析随之被丢弃；
//! - 航班完成后立即从表中移除，后续调用会发起新的解析。
//!
use crate::{context::AppContext, error::AppError};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio_util::sync::CancellationToken;

type SharedFlight<T> = Shared<BoxFuture<'static, T>>;

struct Flight<T>
where
    T: Clone,
{
    id: u64,
    waiters: usize,
    token: CancellationToken,
    future: SharedFlight<T>,
}

pub struct SingleFlight<T>
where
    T: Clone,
{
    flights: DashMap<String, Flight<T>>,
    next_id: AtomicU64,
}

impl<T> Default for SingleFlight<T>
where
    T: Clone,
{
    fn default() -> Self {
        Self {
            flights: DashMap::new(),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// 在 `key` 上执行（或加入）一次解析
    ///
    /// `make` 仅在创建新航班时调用，收到的令牌在所有等待方离开后被取消。
    /// 调用方被取消或超时时返回 `AppError::Cancelled` / `AppError::DeadlineExceeded`。
    pub async fn run<F, Fut>(&self, key: &str, ctx: &AppContext, make: F) -> Result<T, AppError>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (id, future, joined) = self.join(key, make);
        if joined {
            tracing::debug!(key, "joined in-flight resolution");
        }

        let _waiter = Waiter {
            flights: &self.flights,
            key,
            id,
        };

        let outcome = tokio::select! {
            biased;
            err = ctx.done() => Err(err),
            out = future => Ok(out),
        };

        if outcome.is_ok() {
            self.flights.remove_if(key, |_, flight| flight.id == id);
        }
        outcome
    }

    /// 当前在途航班数
    pub fn in_flight(&self) -> usize {
        self.flights.len()
    }

    /// 指定键上正在等待的调用方数量
    pub fn waiters(&self, key: &str) -> usize {
        self.flights.get(key).map(|f| f.waiters).unwrap_or(0)
    }

    fn join<F, Fut>(&self, key: &str, make: F) -> (u64, SharedFlight<T>, bool)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        match self.flights.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let flight = occupied.get_mut();
                flight.waiters += 1;
                (flight.id, flight.future.clone(), true)
            }
            Entry::Vacant(vacant) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let token = CancellationToken::new();
                let future = make(token.clone()).boxed().shared();
                vacant.insert(Flight {
                    id,
                    waiters: 1,
                    token,
                    future: future.clone(),
                });
                (id, future, false)
            }
        }
    }
}

/// 等待方登记：离开（含被取消）时减少计数，最后一个离开者负责收尾
struct Waiter<'a, T>
where
    T: Clone,
{
    flights: &'a DashMap<String, Flight<T>>,
    key: &'a str,
    id: u64,
}

impl<T> Drop for Waiter<'_, T>
where
    T: Clone,
{
    fn drop(&mut self) {
        let id = self.id;
        let abandoned = self.flights.remove_if_mut(self.key, |_, flight| {
            if flight.id != id {
                return false;
            }
            flight.waiters = flight.waiters.saturating_sub(1);
            flight.waiters == 0
        });

        if let Some((_, flight)) = abandoned {
            flight.token.cancel();
        }
    }
}
