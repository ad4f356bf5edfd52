//! Mutation followed by a full reload of the owning aggregate.

use std::future::Future;

use crate::error::AppResult;

/// Runs `mutation`, then reloads the aggregate it changed.
///
/// The mutation's own response is dropped: the returned view always comes from
/// the reload. `reload` is only called once the mutation has resolved, so the
/// read can never overtake the write. A failed mutation skips the reload.
pub async fn mutate_then_reload<M, T, MutFut, ReloadFut, Reload>(
    mutation: MutFut,
    reload: Reload,
) -> AppResult<T>
where
    MutFut: Future<Output = AppResult<M>>,
    Reload: FnOnce() -> ReloadFut,
    ReloadFut: Future<Output = AppResult<T>>,
{
    mutation.await?;
    reload().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::error::AppError;

    #[tokio::test]
    async fn reload_runs_after_mutation() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let mutation_log = log.clone();
        let reload_log = log.clone();
        let view = mutate_then_reload(
            async move {
                mutation_log.lock().unwrap().push("mutate");
                Ok::<_, AppError>("partial")
            },
            || async move {
                reload_log.lock().unwrap().push("reload");
                Ok::<_, AppError>("fresh")
            },
        )
        .await
        .unwrap();

        assert_eq!(view, "fresh");
        assert_eq!(*log.lock().unwrap(), vec!["mutate", "reload"]);
    }

    #[tokio::test]
    async fn failed_mutation_skips_reload() {
        let reloaded = Arc::new(Mutex::new(false));
        let flag = reloaded.clone();
        let result = mutate_then_reload(
            async { Err::<(), _>(AppError::mutation("removeCartItem", "gone")) },
            || async move {
                *flag.lock().unwrap() = true;
                Ok::<_, AppError>(())
            },
        )
        .await;

        assert!(matches!(result, Err(AppError::RemoteMutation { .. })));
        assert!(!*reloaded.lock().unwrap());
    }
}
