//! Helpers for interpreting `helm` CLI output

use std::collections::BTreeMap;

/// Parses the table printed by `helm plugin list`
///
/// The first non-blank line is a tab-separated header naming the fields;
/// every following non-blank line describes one installed plugin. The
/// columns have changed between helm releases, so each plugin is returned
/// as a map keyed by the lowercased header names rather than as a fixed
/// record. Cell values are trimmed of the whitespace helm pads them with.
///
/// Empty or blank output yields an empty list.
pub fn parse_plugin_list(output: &str) -> Vec<BTreeMap<String, String>> {
    let mut lines = output.lines().map(str::trim).filter(|line| !line.is_empty());

    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let fields = header
        .split('\t')
        .map(|name| name.trim().to_lowercase())
        .collect::<Vec<_>>();

    lines
        .map(|line| {
            fields
                .iter()
                .zip(line.split('\t'))
                .map(|(field, cell)| (field.clone(), cell.trim().to_string()))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_plugin_list;
    use std::collections::BTreeMap;

    fn plugin(fields: &[(&str, &str)]) -> BTreeMap<String, String> {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_output() {
        assert!(parse_plugin_list("").is_empty());
        assert!(parse_plugin_list("\n   \n").is_empty());
    }

    #[test]
    fn parses_the_full_column_set() {
        let output = "\nNAME\tVERSION\tTYPE\tAPIVERSION\tPROVENANCE\tSOURCE\n\
                      diff\t3.4.1  \tcli/v1\tlegacy    \tunknown   \tunknown\n\n        ";
        assert_eq!(
            parse_plugin_list(output),
            vec![plugin(&[
                ("name", "diff"),
                ("version", "3.4.1"),
                ("type", "cli/v1"),
                ("apiversion", "legacy"),
                ("provenance", "unknown"),
                ("source", "unknown"),
            ])],
        );
    }

    #[test]
    fn parses_the_description_column_set() {
        let output = "\nNAME\tVERSION\tDESCRIPTION\n\
                      diff\t3.4.1  \tPreview helm upgrade changes as a diff\n        ";
        assert_eq!(
            parse_plugin_list(output),
            vec![plugin(&[
                ("name", "diff"),
                ("version", "3.4.1"),
                ("description", "Preview helm upgrade changes as a diff"),
            ])],
        );
    }

    #[test]
    fn short_rows_yield_fewer_fields() {
        let output = "NAME\tVERSION\tDESCRIPTION\nminimal\t0.1.0";
        assert_eq!(
            parse_plugin_list(output),
            vec![plugin(&[("name", "minimal"), ("version", "0.1.0")])],
        );
    }
}
