use serde::Serialize;

use crate::AuthMessage;

/// Renders the page served by the auth callback. Its only job is to post
/// `message` to the window that opened it, restricted to `target_origin`.
pub fn render(message: &AuthMessage, target_origin: &str) -> String {
    let message = script_json(message);
    let target_origin = script_json(&target_origin);

    format!(
        r#"<!DOCTYPE html>
<html>
  <body>
    <script>
      (window.opener || window.parent).postMessage({message}, {target_origin});
    </script>
  </body>
</html>
"#
    )
}

/// JSON that is safe to inline inside a `<script>` element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> String {
    // plain data with string keys; serialization does not fail
    let json = serde_json::to_string(value).unwrap_or_else(|_| "null".into());

    let mut escaped = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod test {
    use crate::AuthUser;

    use super::*;

    #[test]
    fn test_render_success_targets_origin() {
        let message = AuthMessage::success(
            "a.b.c",
            AuthUser {
                id: Some("1".into()),
                email: Some("admin@tsukimaru.jp".into()),
                name: Some("月丸".into()),
            },
        );

        let html = render(&message, "https://tsukimaru.jp");

        assert!(html.contains(r#""type":"AUTH_SUCCESS""#));
        assert!(html.contains(r#""jwt":"a.b.c""#));
        assert!(html.contains("月丸"));
        assert!(html.contains(r#", "https://tsukimaru.jp");"#));
        assert!(!html.contains(r#""*""#));
    }

    #[test]
    fn test_render_error() {
        let html = render(&AuthMessage::unauthorized(), "http://localhost:3000");

        assert!(html.contains(
            r#"postMessage({"type":"AUTH_ERROR","error":"Unauthorized"}"#
        ));
    }

    #[test]
    fn test_render_cannot_break_out_of_script() {
        let message = AuthMessage::success(
            "x",
            AuthUser {
                name: Some("</script><script>alert(1)</script>".into()),
                ..Default::default()
            },
        );

        let html = render(&message, "https://tsukimaru.jp");

        assert_eq!(html.matches("</script>").count(), 1);
        assert!(html.contains(r"\u003c/script\u003e\u003cscript\u003e"));
    }

    #[test]
    fn test_script_json_escapes_line_separators() {
        assert_eq!(script_json("a\u{2028}b&"), r#""a\u2028b\u0026""#);
    }
}
