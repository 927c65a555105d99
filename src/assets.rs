// SPDX-License-Identifier: MIT

//! The browser-side shell (§6): one static HTML page that boots a small
//! client runtime to render whatever the server streams over the action
//! WebSocket. `ACTIONCELL_DEV_PROXY` is a seam for pointing that runtime at
//! an external bundler's dev server instead of these embedded assets.

use axum::response::Html;

const INDEX_SHELL: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>actioncell</title>
</head>
<body>
<div id="root"></div>
<script>
  window.__ACTIONCELL_PREFIX__ = "__PREFIX__";
</script>
</body>
</html>
"#;

/// Render the shell page, binding it to the configured route prefix so the
/// client runtime knows where to open its WebSocket.
pub fn index_html(prefix: &str) -> Html<String> {
    Html(INDEX_SHELL.replace("__PREFIX__", prefix))
}
