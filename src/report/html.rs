use super::types::TestReport;
use crate::error::HarnessResult;
use crate::runner::state::{StepStatus, TestStatus};
use std::path::Path;

/// Write the HTML report, or print it when no output is given
pub fn generate(report: &TestReport, output: Option<&Path>) -> HarnessResult<()> {
    let html = generate_html(report);

    if let Some(path) = output {
        std::fs::write(path, html)?;
    } else {
        println!("{}", html);
    }

    Ok(())
}

pub fn generate_html(report: &TestReport) -> String {
    let summary = &report.summary;
    let status_class = status_class(report.status);
    let pass_rate = if summary.total > 0 {
        (summary.passed as f64 / summary.total as f64 * 100.0) as u32
    } else {
        0
    };

    let mut steps_html = String::new();
    for (i, step) in report.steps.iter().enumerate() {
        let (icon, class) = match step.status {
            StepStatus::Passed => ("✓", "passed"),
            StepStatus::Failed => ("✗", "failed"),
        };

        let error_html = step
            .error
            .as_deref()
            .map(|e| format!(r#"<div class="error-message">{}</div>"#, html_escape(e)))
            .unwrap_or_default();

        steps_html.push_str(&format!(
            r#"
                <li class="step {class}">
                    <div class="step-icon">{icon}</div>
                    <div class="step-content">
                        <div class="step-name">{index}. {name}</div>
                        <div class="step-meta">
                            <span class="duration">{duration}</span>
                            <span class="timestamp">{timestamp}</span>
                        </div>
                        {error_html}
                    </div>
                </li>"#,
            index = i + 1,
            name = html_escape(&step.name),
            duration = format_duration(step.duration_ms),
            timestamp = html_escape(&step.timestamp),
        ));
    }
    if report.steps.is_empty() {
        steps_html.push_str(r#"<li class="step empty">No steps were executed.</li>"#);
    }

    let errors_html = if report.errors.is_empty() {
        String::new()
    } else {
        let items: String = report
            .errors
            .iter()
            .map(|e| {
                format!(
                    r#"
                    <div class="error-item">
                        <div class="error-step">{}</div>
                        <div class="error-message">{}</div>
                        <div class="timestamp">{}</div>
                    </div>"#,
                    html_escape(&e.step),
                    html_escape(&e.message),
                    html_escape(&e.timestamp)
                )
            })
            .collect();
        format!(
            r#"
        <section class="card error-details">
            <h2>Error Details</h2>
            {items}
        </section>"#
        )
    };

    let end_time = report.end_time.as_deref().unwrap_or("-");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Test Execution Report - {case_id}</title>
    <style>
        :root {{
            --bg-primary: #0a0f1d;
            --bg-secondary: #141b2d;
            --border: #374151;
            --text-primary: #f9fafb;
            --text-secondary: #9ca3af;
            --green: #10b981;
            --red: #ef4444;
            --yellow: #f59e0b;
            --purple: #8b5cf6;
        }}

        * {{ margin: 0; padding: 0; box-sizing: border-box; }}

        body {{
            font-family: 'Inter', system-ui, -apple-system, sans-serif;
            background: var(--bg-primary);
            color: var(--text-primary);
            line-height: 1.5;
            padding: 3rem 1rem;
        }}

        .container {{ max-width: 1000px; margin: 0 auto; }}

        header {{
            margin-bottom: 2rem;
            display: flex;
            justify-content: space-between;
            align-items: flex-end;
        }}

        h1 {{ font-size: 2rem; font-weight: 800; }}
        h2 {{ font-size: 1.125rem; margin-bottom: 1rem; }}

        .badge {{
            padding: 0.375rem 1rem;
            border-radius: 9999px;
            font-weight: 700;
            letter-spacing: 0.05em;
        }}
        .badge.passed {{ background: rgba(16, 185, 129, 0.15); color: var(--green); }}
        .badge.failed {{ background: rgba(239, 68, 68, 0.15); color: var(--red); }}
        .badge.pending {{ background: rgba(245, 158, 11, 0.15); color: var(--yellow); }}

        .summary {{
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
            gap: 1rem;
            margin-bottom: 2rem;
        }}

        .card, .stat {{
            background: var(--bg-secondary);
            border: 1px solid var(--border);
            border-radius: 1rem;
            padding: 1.25rem;
        }}
        .card {{ margin-bottom: 2rem; }}

        .stat-value {{ font-size: 1.5rem; font-weight: 800; word-break: break-all; }}
        .stat-label {{
            color: var(--text-secondary);
            font-size: 0.75rem;
            text-transform: uppercase;
            letter-spacing: 0.05em;
        }}
        .stat.passed .stat-value {{ color: var(--green); }}
        .stat.failed .stat-value {{ color: var(--red); }}

        .steps {{ list-style: none; }}
        .step {{
            display: flex;
            gap: 1rem;
            padding: 0.75rem;
            border-radius: 0.75rem;
            margin-bottom: 0.5rem;
        }}
        .step-icon {{
            width: 2rem;
            height: 2rem;
            display: flex;
            align-items: center;
            justify-content: center;
            border-radius: 0.5rem;
            flex-shrink: 0;
        }}
        .step.passed .step-icon {{ background: rgba(16, 185, 129, 0.1); color: var(--green); }}
        .step.failed .step-icon {{ background: rgba(239, 68, 68, 0.1); color: var(--red); }}
        .step-content {{ flex: 1; }}
        .step-name {{ font-family: 'JetBrains Mono', monospace; font-weight: 500; }}
        .step-meta {{ display: flex; gap: 1rem; }}

        .duration, .timestamp {{ color: var(--text-secondary); font-size: 0.75rem; }}

        .error-message {{
            background: rgba(239, 68, 68, 0.1);
            border: 1px solid rgba(239, 68, 68, 0.2);
            border-radius: 0.5rem;
            padding: 0.75rem;
            margin-top: 0.5rem;
            color: #fca5a5;
            font-family: 'JetBrains Mono', monospace;
            font-size: 0.8125rem;
        }}
        .error-item {{ margin-bottom: 1rem; }}
        .error-step {{ font-weight: 600; }}

        .stack li {{ margin-left: 1.25rem; color: var(--text-secondary); }}

        .meta {{
            margin-top: 2rem;
            color: var(--text-secondary);
            font-size: 0.8125rem;
            text-align: center;
        }}
    </style>
</head>
<body>
    <div class="container">
        <header>
            <div>
                <div style="font-size: 0.875rem; font-weight: 600; color: var(--purple); text-transform: uppercase; letter-spacing: 0.1em;">{case_id}</div>
                <h1>Test Execution Report</h1>
                <div style="color: var(--text-secondary);">{description}</div>
            </div>
            <span class="badge {status_class}">{status_label}</span>
        </header>

        <div class="summary">
            <div class="stat">
                <div class="stat-value">{duration}</div>
                <div class="stat-label">Total Duration</div>
            </div>
            <div class="stat">
                <div class="stat-value">{total}</div>
                <div class="stat-label">Steps</div>
            </div>
            <div class="stat passed">
                <div class="stat-value">{passed}</div>
                <div class="stat-label">Passed</div>
            </div>
            <div class="stat failed">
                <div class="stat-value">{failed}</div>
                <div class="stat-label">Failed</div>
            </div>
            <div class="stat">
                <div class="stat-value">{pass_rate}%</div>
                <div class="stat-label">Success Rate</div>
            </div>
        </div>

        <section class="card">
            <h2>Run Details</h2>
            <div>Generated username: <strong class="username">{username}</strong></div>
            <div>Started: <span class="timestamp">{start_time}</span></div>
            <div>Finished: <span class="timestamp">{end_time}</span></div>
        </section>

        <section class="card">
            <h2>Steps</h2>
            <ul class="steps">{steps_html}
            </ul>
        </section>
        {errors_html}

        <section class="card stack">
            <h2>Technology Stack</h2>
            <ul>
                <li>Rust with the Tokio async runtime</li>
                <li>Playwright browser automation (Chromium, Firefox, WebKit)</li>
                <li>Serde JSON results alongside this HTML report</li>
                <li>Target: ParaBank demo banking application</li>
            </ul>
        </section>

        <div class="meta">
            <span>Run: {run_id}</span> &middot; <span>Generated: {generated_at}</span>
        </div>
    </div>
</body>
</html>"#,
        case_id = html_escape(&report.case_id),
        description = html_escape(&report.description),
        status_label = report.status.label(),
        duration = format_duration(report.duration_ms),
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        username = html_escape(&report.username),
        start_time = html_escape(&report.start_time),
        end_time = html_escape(end_time),
        run_id = html_escape(&report.run_id),
        generated_at = html_escape(&report.generated_at),
    )
}

fn status_class(status: TestStatus) -> &'static str {
    match status {
        TestStatus::Passed => "passed",
        TestStatus::Failed => "failed",
        TestStatus::Pending => "pending",
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let minutes = ms / 60000;
        let seconds = (ms % 60000) as f64 / 1000.0;
        format!("{}m {:.0}s", minutes, seconds)
    }
}
