//! Dashboard HTML page handler for the transaction dashboard service.

use crate::format::{format_eth_amount, format_time_ago, format_uptime, shorten_address};
use crate::routes::AppState;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use std::sync::Arc;
use tx_dashboard_types::{TransactionState, TransactionStatus};

pub async fn dashboard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.store.snapshot();
    let user = state.session.current_user();
    let uptime = state.start_time.elapsed().as_secs();
    let now = chrono::Utc::now().timestamp_millis();

    let html = render_page(&snapshot, user.as_ref().map(|u| u.username.as_str()), uptime, now);

    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html)
}

fn render_page(snapshot: &TransactionState, username: Option<&str>, uptime: u64, now: i64) -> String {
    let s = &snapshot.stats;
    let stats_html = format!(
        r#"<div class="stats">
                <div class="stat"><span class="val">{}</span><span class="lbl">Total</span></div>
                <div class="stat green"><span class="val">{}</span><span class="lbl">Successful</span></div>
                <div class="stat red"><span class="val">{}</span><span class="lbl">Failed</span></div>
                <div class="stat yellow"><span class="val">{}</span><span class="lbl">Pending</span></div>
            </div>"#,
        s.total, s.successful, s.failed, s.pending
    );

    let mut rows = String::new();
    for tx in &snapshot.transactions {
        let status_class = match tx.status {
            TransactionStatus::Success => "green",
            TransactionStatus::Failed => "red",
            TransactionStatus::Pending => "yellow",
        };
        let hash = tx
            .hash
            .as_deref()
            .map(|h| shorten_address(h, 6))
            .unwrap_or_else(|| "-".to_string());
        rows.push_str(&format!(
            "<tr><td class=\"mono\">{} ETH</td><td class=\"mono\" title=\"{}\">{}</td><td><span class=\"badge {}\">{}</span></td><td class=\"mono\">{}</td><td>{}</td></tr>\n",
            format_eth_amount(tx.amount),
            escape_html(&tx.receiver_address),
            escape_html(&shorten_address(&tx.receiver_address, 4)),
            status_class,
            tx.status,
            escape_html(&hash),
            format_time_ago(tx.timestamp, now),
        ));
    }
    if rows.is_empty() {
        rows = "<tr><td colspan=\"5\">No transactions yet.</td></tr>".to_string();
    }

    let error_banner = match &snapshot.error {
        Some(e) => format!(r#"<div class="banner">{}</div>"#, escape_html(e)),
        None => String::new(),
    };

    let user_str = match username {
        Some(name) => format!("Signed in as {}", escape_html(name)),
        None => "Not signed in".to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Transaction Dashboard</title>
<style>
  * {{ margin: 0; padding: 0; box-sizing: border-box; }}
  body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #0f1117; color: #e0e0e0; padding: 20px; }}
  h1 {{ color: #58a6ff; margin-bottom: 8px; }}
  .meta {{ color: #8b949e; font-size: 0.85em; margin-bottom: 20px; }}
  .stats {{ display: flex; gap: 16px; margin-bottom: 24px; flex-wrap: wrap; }}
  .stat {{ background: #161b22; border: 1px solid #30363d; border-radius: 8px; padding: 16px 24px; text-align: center; min-width: 140px; }}
  .stat .val {{ display: block; font-size: 2em; font-weight: bold; color: #58a6ff; }}
  .stat.green .val {{ color: #3fb950; }}
  .stat.red .val {{ color: #f85149; }}
  .stat.yellow .val {{ color: #d29922; }}
  .stat .lbl {{ display: block; font-size: 0.85em; color: #8b949e; margin-top: 4px; }}
  .banner {{ background: #3d1418; border: 1px solid #f85149; color: #ffa198; border-radius: 6px; padding: 10px 14px; margin-bottom: 20px; }}
  table {{ width: 100%; border-collapse: collapse; margin-bottom: 24px; }}
  th {{ background: #161b22; color: #8b949e; text-align: left; padding: 8px 12px; font-size: 0.85em; text-transform: uppercase; border-bottom: 1px solid #30363d; }}
  td {{ padding: 8px 12px; border-bottom: 1px solid #21262d; font-size: 0.9em; }}
  tr:hover {{ background: #161b22; }}
  .mono {{ font-family: 'SF Mono', 'Consolas', monospace; font-size: 0.85em; }}
  .badge {{ padding: 2px 8px; border-radius: 10px; font-size: 0.8em; background: #21262d; }}
  .badge.green {{ color: #3fb950; }}
  .badge.red {{ color: #f85149; }}
  .badge.yellow {{ color: #d29922; }}
  h2 {{ color: #c9d1d9; margin-bottom: 12px; font-size: 1.1em; }}
  .section {{ margin-bottom: 28px; }}
</style>
</head>
<body>
  <h1>Transaction Dashboard</h1>
  <p class="meta">{user_str} &middot; Uptime: {uptime_str}</p>

  {error_banner}
  {stats_html}

  <div class="section">
    <h2>Recent Transactions</h2>
    <table>
      <thead><tr><th>Amount</th><th>Receiver</th><th>Status</th><th>Hash</th><th>When</th></tr></thead>
      <tbody>{rows}</tbody>
    </table>
  </div>

  <script>setTimeout(() => location.reload(), {refresh_ms});</script>
</body>
</html>"#,
        user_str = user_str,
        uptime_str = format_uptime(uptime),
        error_banner = error_banner,
        stats_html = stats_html,
        rows = rows,
        // poll faster while anything is still resolving
        refresh_ms = if s.pending > 0 { 2000 } else { 30000 },
    )
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
