use axum::response::Html;

// The admin UI proper is a thin client: each shell fetches JSON from the
// corresponding /api/admin endpoint. Only the login page is reachable
// without a session.

const NAV: &str = r#"<nav>
  <a href="/bookings">Bookings</a>
  <a href="/analytics">Analytics</a>
  <a href="/categories">Categories</a>
  <a href="/users">Users</a>
</nav>"#;

fn shell(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\">\n  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n  <title>{title} | Market Admin</title>\n</head>\n<body>\n{nav}\n<main>\n{body}\n</main>\n</body>\n</html>\n",
        title = title,
        nav = NAV,
        body = body,
    ))
}

pub async fn login() -> Html<String> {
    Html(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Sign in | Market Admin</title>
</head>
<body>
<main>
  <h1>Sign in</h1>
  <form id="login" data-endpoint="/api/admin/auth/login">
    <label>Email <input type="email" name="email" required></label>
    <label>Password <input type="password" name="password" required></label>
    <button type="submit">Sign in</button>
  </form>
</main>
</body>
</html>
"#
        .to_string(),
    )
}

pub async fn dashboard() -> Html<String> {
    shell("Dashboard", r#"<h1>Dashboard</h1><section data-endpoint="/api/admin/analytics"></section>"#)
}

pub async fn bookings() -> Html<String> {
    shell("Bookings", r#"<h1>Bookings</h1><section data-endpoint="/api/admin/bookings"></section>"#)
}

pub async fn analytics() -> Html<String> {
    shell("Analytics", r#"<h1>Analytics</h1><section data-endpoint="/api/admin/analytics"></section>"#)
}

pub async fn categories() -> Html<String> {
    shell("Categories", r#"<h1>Categories</h1><section data-endpoint="/api/admin/categories"></section>"#)
}

pub async fn users() -> Html<String> {
    shell("Users", r#"<h1>Users</h1><section data-endpoint="/api/admin/users"></section>"#)
}
