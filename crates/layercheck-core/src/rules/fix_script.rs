//! AutoLISP rendering of repair actions.
//!
//! The script defines a `FixLayers` command that runs a single `-LAYER`
//! command: `"N"` creates a layer, `"C"` sets an index color and
//! `"C" "T" "r,g,b"` sets a true color.

use super::verdict::FixAction;

const HEADER: &[&str] = &[
    ";; Auto-Generated Fix Script by layercheck",
    ";; Run this script in AutoCAD (Drag & Drop or APPLOAD)",
    "",
    "(defun c:FixLayers ()",
    "  (setvar \"CMDECHO\" 0)",
    "  (command \"-LAYER\"",
];

const FOOTER: &[&str] = &[
    "    \"\")",
    "  (setvar \"CMDECHO\" 1)",
    "  (princ \"\\nLayers Updated Successfully.\")",
    "  (princ)",
    ")",
    "",
    "(princ \"\\nType FixLayers to run the script.\")",
];

/// Quote a value as a LISP string literal
fn lisp_str(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// `-LAYER` color option for a fix-action color (`"3"` or `"T 255,0,0"`)
fn color_option(color: &str, layer: &str) -> String {
    match color.strip_prefix("T ") {
        Some(rgb) => format!("\"C\" \"T\" {} {}", lisp_str(rgb.trim()), lisp_str(layer)),
        None => format!("\"C\" {} {}", lisp_str(color), lisp_str(layer)),
    }
}

/// Render `actions` as an AutoLISP script.
///
/// Actions with an empty layer or color are skipped. An empty action list
/// still yields a loadable script that changes nothing.
pub fn render_lisp(actions: &[FixAction]) -> String {
    let mut lines: Vec<String> = HEADER.iter().map(|s| s.to_string()).collect();

    for action in actions {
        let (layer, color, create) = match action {
            FixAction::CreateLayer { layer, color } => (layer, color, true),
            FixAction::FixColor { layer, color } => (layer, color, false),
        };
        if layer.is_empty() || color.is_empty() {
            tracing::debug!(?action, "fix action without layer or color skipped");
            continue;
        }
        if create {
            lines.push(format!("    \"N\" {}", lisp_str(layer)));
        }
        lines.push(format!("    {}", color_option(color, layer)));
    }

    lines.extend(FOOTER.iter().map(|s| s.to_string()));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_actions_render_a_no_op_command() {
        let script = render_lisp(&[]);
        assert!(script.contains("(command \"-LAYER\"\n    \"\")"));
    }

    #[test]
    fn test_quotes_in_layer_names_are_escaped() {
        assert_eq!(lisp_str(r#"A"B\C"#), r#""A\"B\\C""#);
    }

    #[test]
    fn test_incomplete_actions_are_skipped() {
        let script = render_lisp(&[FixAction::FixColor {
            layer: String::new(),
            color: "3".to_string(),
        }]);
        assert_eq!(script, render_lisp(&[]));
    }
}
