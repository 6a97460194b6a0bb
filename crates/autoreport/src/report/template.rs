//! Page chrome for the HTML report.

pub const REPORT_TITLE: &str = "Automated Business Intelligence Report";

pub const STYLESHEET: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }

        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            line-height: 1.6;
            color: #333;
            background: #f5f5f5;
            padding: 20px;
        }

        .container {
            max-width: 1200px;
            margin: 0 auto;
            background: white;
            padding: 40px;
            box-shadow: 0 2px 8px rgba(0,0,0,0.1);
            border-radius: 8px;
        }

        h1 { color: #1a73e8; margin-bottom: 30px; padding-bottom: 15px; border-bottom: 3px solid #1a73e8; }
        h2 { color: #34495e; margin-top: 30px; margin-bottom: 15px; }
        h3 { color: #555; margin-top: 20px; margin-bottom: 10px; }
        p { margin-bottom: 12px; }

        .metadata {
            background: #e8f4f8;
            padding: 15px;
            border-radius: 5px;
            margin-bottom: 30px;
            border-left: 4px solid #1a73e8;
        }
        .metadata p { margin: 5px 0; font-size: 0.95em; }

        .narrative { margin-bottom: 40px; }
        .visualizations { margin-top: 40px; }

        .plot-container {
            margin: 30px 0;
            padding: 20px;
            background: #fafafa;
            border-radius: 8px;
            border: 1px solid #e0e0e0;
        }

        table { width: 100%; border-collapse: collapse; margin: 20px 0; }
        th, td { padding: 12px; text-align: left; border: 1px solid #ddd; }
        th { background-color: #1a73e8; color: white; }
        tr:nth-child(even) { background-color: #f9f9f9; }

        code {
            background: #f4f4f4;
            padding: 2px 6px;
            border-radius: 3px;
            font-family: 'Courier New', monospace;
        }

        ul, ol { margin-left: 20px; margin-bottom: 15px; }
        li { margin-bottom: 8px; }

        footer {
            margin-top: 60px;
            padding-top: 20px;
            border-top: 1px solid #ddd;
            text-align: center;
            color: #777;
            font-size: 0.9em;
        }

        @media print {
            body { background: white; padding: 0; }
            .container { box-shadow: none; padding: 20px; }
        }
"#;

/// Wrap the three report sections in the styled document.
pub fn document(metadata_html: &str, narrative_html: &str, plots_html: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{style}</style>
</head>
<body>
    <div class="container">
        <h1>🚗 {title}</h1>
{metadata}
        <div class="narrative">
{narrative}
        </div>
{plots}
        <footer>
            <p>This report was automatically generated using AI-powered analysis.</p>
        </footer>
    </div>
</body>
</html>
"#,
        title = REPORT_TITLE,
        style = STYLESHEET,
        metadata = metadata_html,
        narrative = narrative_html,
        plots = plots_html,
    )
}
