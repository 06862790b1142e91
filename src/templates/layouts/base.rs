use maud::{html, Markup, DOCTYPE};

const PAGE_CSS: &str = r#"
body { font-family: system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
       margin: 0; padding: 0 1.5rem 3rem; background-color: #f5f6fa; }
header { padding: 1.5rem 0; text-align: center; }
.grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(320px, 1fr)); gap: 1.5rem; }
.card { background: #fff; border-radius: 12px; padding: 1rem 1.5rem;
        box-shadow: 0 10px 25px rgba(31, 45, 61, 0.08); }
form { background: #fff; padding: 1.5rem; border-radius: 12px;
       box-shadow: 0 10px 25px rgba(31, 45, 61, 0.08); margin-bottom: 2rem;
       display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 1rem 1.5rem; }
label { font-weight: 600; display: flex; flex-direction: column; font-size: 0.9rem; }
input, select { margin-top: 0.35rem; padding: 0.6rem 0.75rem; border-radius: 8px;
                border: 1px solid #d0d7de; font-size: 0.95rem; }
button { grid-column: 1 / -1; padding: 0.75rem 1.25rem; border-radius: 8px; border: none;
         background: #2563eb; color: #fff; font-size: 1rem; font-weight: 600; cursor: pointer; }
button:hover { background: #1d4ed8; }
.controls { margin: 1rem 0 2rem; display: flex; flex-wrap: wrap; gap: 0.75rem; align-items: center; }
.status { font-size: 0.9rem; }
"#;

pub fn base_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js" {}
                style { (maud::PreEscaped(PAGE_CSS)) }
            }
            body {
                header {
                    h1 { (title) }
                }
                (content)
            }
        }
    }
}
