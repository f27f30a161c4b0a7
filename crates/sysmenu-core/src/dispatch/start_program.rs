//! Argument expansion for "Start Program" items.

use crate::config::StartProgramItem;
use crate::desktop::LaunchRequest;

/// Values substituted for the built-in placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct Placeholders<'a> {
    pub process_id: Option<u32>,
    pub process_name: Option<&'a str>,
    pub window_title: &'a str,
}

impl Placeholders<'_> {
    fn lookup(&self, name: &str) -> Option<String> {
        if name.eq_ignore_ascii_case("ProcessId") {
            Some(self.process_id.map(|p| p.to_string()).unwrap_or_default())
        } else if name.eq_ignore_ascii_case("ProcessName") {
            Some(self.process_name.unwrap_or_default().to_string())
        } else if name.eq_ignore_ascii_case("WindowTitle") {
            Some(self.window_title.to_string())
        } else {
            None
        }
    }
}

/// Expands `begin name end` placeholders in `template`.
///
/// Built-in names match case-insensitively. Any other name is asked
/// for through `prompt`; a cancelled prompt aborts the whole expansion.
/// An unterminated placeholder is kept literally.
pub fn expand_arguments(
    template: &str,
    begin: &str,
    end: &str,
    values: &Placeholders<'_>,
    prompt: &mut dyn FnMut(&str) -> Option<String>,
) -> Option<String> {
    if begin.is_empty() || end.is_empty() {
        return Some(template.to_string());
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find(begin) {
        let after = &rest[start + begin.len()..];
        let Some(stop) = after.find(end) else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = &after[..stop];
        let value = match values.lookup(name) {
            Some(value) => value,
            None => prompt(name)?,
        };
        out.push_str(&value);
        rest = &after[stop + end.len()..];
    }
    out.push_str(rest);
    Some(out)
}

/// Builds the launch for `item`, or `None` when the user cancelled a prompt.
pub fn launch_request(
    item: &StartProgramItem,
    values: &Placeholders<'_>,
    process_path: Option<&str>,
    prompt: &mut dyn FnMut(&str) -> Option<String>,
) -> Option<LaunchRequest> {
    let arguments = expand_arguments(
        &item.arguments,
        &item.begin_parameter,
        &item.end_parameter,
        values,
        prompt,
    )?;
    let working_directory = if item.use_window_working_directory {
        process_path
            .and_then(|p| p.rsplit_once(['\\', '/']))
            .map(|(dir, _)| dir.to_string())
    } else {
        None
    };
    Some(LaunchRequest {
        file_name: item.file_name.clone(),
        arguments,
        show_window: item.show_window,
        run_as: item.run_as,
        working_directory,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> Placeholders<'static> {
        Placeholders {
            process_id: Some(42),
            process_name: Some("notepad.exe"),
            window_title: "Untitled - Notepad",
        }
    }

    #[test]
    fn builtin_names_match_case_insensitively() {
        // Act
        let out = expand_arguments("/pid {processid} /n {ProcessName}", "{", "}", &values(), &mut |_| None);

        // Assert
        assert_eq!(out.as_deref(), Some("/pid 42 /n notepad.exe"));
    }

    #[test]
    fn unknown_names_are_prompted() {
        // Arrange
        let mut asked = Vec::new();

        // Act
        let out = expand_arguments("--file [[Path]]", "[[", "]]", &values(), &mut |name| {
            asked.push(name.to_string());
            Some("C:\\a.txt".into())
        });

        // Assert
        assert_eq!(out.as_deref(), Some("--file C:\\a.txt"));
        assert_eq!(asked, vec!["Path"]);
    }

    #[test]
    fn cancelled_prompt_aborts() {
        // Act
        let out = expand_arguments("{WindowTitle} {Other}", "{", "}", &values(), &mut |_| None);

        // Assert
        assert_eq!(out, None);
    }

    #[test]
    fn unterminated_placeholder_is_literal() {
        // Act
        let out = expand_arguments("a {ProcessId} {open", "{", "}", &values(), &mut |_| None);

        // Assert
        assert_eq!(out.as_deref(), Some("a 42 {open"));
    }

    #[test]
    fn working_directory_comes_from_the_process() {
        // Arrange
        let item = StartProgramItem {
            title: "Shell here".into(),
            file_name: "cmd.exe".into(),
            use_window_working_directory: true,
            ..Default::default()
        };

        // Act
        let request = launch_request(&item, &values(), Some("C:\\Tools\\app.exe"), &mut |_| None)
            .expect("request");

        // Assert
        assert_eq!(request.working_directory.as_deref(), Some("C:\\Tools"));
    }
}
