//! Self-contained HTML approval page for a block diagram.

use crate::model::Diagram;
use chrono::{DateTime, SecondsFormat, Utc};

/// Render the approval page: project info, stat cards, the Mermaid diagram
/// (rendered client-side by the mermaid CDN script), and approve / reject /
/// modify buttons that surface the response text to paste back into the
/// workflow chat.
///
/// Important: we avoid `format!()` because the page contains many `{}` from
/// CSS rules and JS template literals (e.g., `${x}`), which would conflict
/// with Rust formatting.
pub fn render_approval_page(
    diagram: &Diagram,
    mermaid: &str,
    project: &str,
    system_type: &str,
    generated: DateTime<Utc>,
) -> String {
    TEMPLATE
        .replace("__PROJECT__", project)
        .replace("__SYSTEM_TYPE__", system_type)
        .replace(
            "__GENERATED__",
            &generated.to_rfc3339_opts(SecondsFormat::Millis, true),
        )
        .replace("__BLOCK_COUNT__", &diagram.blocks.len().to_string())
        .replace("__CONNECTION_COUNT__", &diagram.connections.len().to_string())
        .replace("__MERMAID__", mermaid)
}

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Block Diagram - __PROJECT__</title>
    <script src="https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.min.js"></script>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 0;
            padding: 20px;
            background: #f5f5f5;
        }
        .container {
            max-width: 1400px;
            margin: 0 auto;
            background: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 8px rgba(0,0,0,0.1);
        }
        h1 {
            color: #333;
            border-bottom: 3px solid #4A90E2;
            padding-bottom: 10px;
        }
        .info {
            background: #f8f9fa;
            padding: 15px;
            border-radius: 5px;
            margin: 20px 0;
        }
        .diagram {
            margin: 30px 0;
            padding: 20px;
            background: #fafafa;
            border-radius: 5px;
            overflow-x: auto;
        }
        .stats {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
            gap: 15px;
            margin: 20px 0;
        }
        .stat-card {
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            color: white;
            padding: 20px;
            border-radius: 5px;
            text-align: center;
        }
        .stat-value {
            font-size: 32px;
            font-weight: bold;
        }
        .stat-label {
            font-size: 14px;
            opacity: 0.9;
        }
        .buttons {
            margin: 30px 0;
            display: flex;
            gap: 15px;
            flex-wrap: wrap;
        }
        button {
            padding: 12px 24px;
            font-size: 16px;
            border: none;
            border-radius: 5px;
            cursor: pointer;
            transition: all 0.3s;
            font-weight: 600;
        }
        .approve {
            background: #28a745;
            color: white;
        }
        .approve:hover {
            background: #218838;
            transform: translateY(-2px);
            box-shadow: 0 4px 8px rgba(0,0,0,0.2);
        }
        .reject {
            background: #dc3545;
            color: white;
        }
        .reject:hover {
            background: #c82333;
            transform: translateY(-2px);
            box-shadow: 0 4px 8px rgba(0,0,0,0.2);
        }
        .modify {
            background: #ffc107;
            color: #333;
        }
        .modify:hover {
            background: #e0a800;
            transform: translateY(-2px);
            box-shadow: 0 4px 8px rgba(0,0,0,0.2);
        }
        #response {
            margin-top: 20px;
            padding: 20px;
            border-radius: 5px;
            display: none;
            font-size: 16px;
        }
        .copy-btn {
            background: #007bff;
            color: white;
            padding: 8px 16px;
            border: none;
            border-radius: 4px;
            cursor: pointer;
            margin-top: 10px;
        }
        .copy-btn:hover {
            background: #0056b3;
        }
    </style>
</head>
<body>
    <div class="container">
        <h1>🔧 Block Diagram Preview</h1>

        <div class="info">
            <strong>Project:</strong> __PROJECT__<br>
            <strong>System Type:</strong> __SYSTEM_TYPE__<br>
            <strong>Generated:</strong> __GENERATED__
        </div>

        <div class="stats">
            <div class="stat-card">
                <div class="stat-value">__BLOCK_COUNT__</div>
                <div class="stat-label">Total Blocks</div>
            </div>
            <div class="stat-card">
                <div class="stat-value">__CONNECTION_COUNT__</div>
                <div class="stat-label">Connections</div>
            </div>
        </div>

        <div class="diagram">
            <div class="mermaid">
__MERMAID__
            </div>
        </div>

        <div class="buttons">
            <button class="approve" onclick="approve()">✅ APPROVE</button>
            <button class="reject" onclick="reject()">❌ REJECT</button>
            <button class="modify" onclick="modify()">✏️ MODIFY</button>
        </div>

        <div id="response"></div>
    </div>

    <script>
        mermaid.initialize({ startOnLoad: true, theme: 'default' });

        function copyToClipboard(text) {
            navigator.clipboard.writeText(text).then(() => {
                alert('Copied to clipboard! Paste this in the workflow chat.');
            });
        }

        function showResponse(background, color, heading, text) {
            const responseDiv = document.getElementById('response');
            responseDiv.style.display = 'block';
            responseDiv.style.background = background;
            responseDiv.style.color = color;
            responseDiv.innerHTML = `
                <strong>${heading}</strong><br>
                <p>Copy this text and paste in the workflow chat:</p>
                <code style="background: #fff; padding: 10px; display: block; border-radius: 4px; margin: 10px 0;">${text}</code>
                <button class="copy-btn" onclick="copyToClipboard('${text.replace(/'/g, "\\'")}')">📋 Copy</button>
            `;
        }

        function approve() {
            showResponse('#d4edda', '#155724', '✅ APPROVED!', 'APPROVE');
        }

        function reject() {
            const reason = prompt('Why are you rejecting? (optional)');
            const text = 'REJECT' + (reason ? ': ' + reason : '');
            showResponse('#f8d7da', '#721c24', '❌ REJECTED!', text);
        }

        function modify() {
            const changes = prompt('What changes do you want?');
            const text = 'MODIFY: ' + (changes || 'Please make changes');
            showResponse('#fff3cd', '#856404', '✏️ MODIFICATION REQUESTED!', text);
        }
    </script>
</body>
</html>
"##;
