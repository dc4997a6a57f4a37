//! Transaction completion helper.

use tracing::error;

use quizhub_core::result::AppResult;
use quizhub_core::traits::StoreTx;

/// Finish a unit of work: commit on `Ok`, roll back on `Err`.
///
/// On the error path the original error is returned; a failing rollback
/// is only logged.
pub async fn finish<T>(tx: Box<dyn StoreTx>, result: AppResult<T>) -> AppResult<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                error!(
                    error = %rollback_err,
                    original = %err,
                    "Transaction rollback failed"
                );
            }
            Err(err)
        }
    }
}
