//! Index page - user listing rendered inline

use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};

use crate::AppState;

/// GET /
///
/// Landing page listing registered users with links to their favorites.
pub async fn index_page(State(state): State<AppState>) -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");

    let users = state.data.get_all_users().await;
    let mut entries: Vec<_> = users.into_iter().collect();
    entries.sort_by(|a, b| a.1.name.cmp(&b.1.name));

    let user_list = if entries.is_empty() {
        "<li class=\"empty\">No users yet</li>".to_string()
    } else {
        entries
            .iter()
            .map(|(user_id, user)| {
                format!(
                    "<li><a href=\"/users/{}/movies\">{}</a></li>",
                    escape_html(user_id),
                    escape_html(&user.name)
                )
            })
            .collect::<Vec<_>>()
            .join("\n            ")
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>MoviWeb</title>
    <style>
        * {{
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }}
        body {{
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background-color: #1a1a1a;
            color: #e0e0e0;
            line-height: 1.6;
        }}
        header {{
            background-color: #2a2a2a;
            border-bottom: 1px solid #3a3a3a;
            padding: 20px;
            margin-bottom: 30px;
        }}
        h1 {{
            font-size: 26px;
            color: #4a9eff;
        }}
        .subtitle {{
            color: #888;
            font-size: 14px;
        }}
        .container {{
            padding: 0 20px;
        }}
        ul {{
            list-style: none;
        }}
        li {{
            padding: 8px 0;
            border-bottom: 1px solid #2a2a2a;
        }}
        li.empty {{
            color: #888;
        }}
        a {{
            color: #4a9eff;
            text-decoration: none;
        }}
        a:hover {{
            text-decoration: underline;
        }}
    </style>
</head>
<body>
    <header>
        <h1>MoviWeb</h1>
        <div class="subtitle">v{version}</div>
    </header>
    <div class="container">
        <h2>Users</h2>
        <ul>
            {user_list}
        </ul>
    </div>
</body>
</html>"#
    );

    Html(html)
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new().route("/", get(index_page))
}
