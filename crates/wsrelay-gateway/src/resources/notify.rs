use wsrelay_core::protocol::Notice;

use crate::app_state::AppState;

use super::model::Resource;

/// Broadcast a mutation notice to every connected client.
///
/// Fire-and-forget for the caller: delivery failures are only logged.
pub async fn announce<R: Resource>(app: &AppState, notice: Notice<'_>) {
    if !R::ANNOUNCE {
        return;
    }
    app.metrics()
        .mutation_notices
        .inc(&[("kind", R::KIND.as_str()), ("action", notice.action())]);

    let report = app.registry().broadcast(&notice.to_string()).await;
    tracing::info!(
        kind = %R::KIND,
        action = notice.action(),
        recipients = report.attempted,
        failed = report.failed.len(),
        "mutation notice"
    );
}
