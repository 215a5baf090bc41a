use std::{borrow::Cow, io, time::Duration};

use dialoguer::{theme::ColorfulTheme, Select};
use indicatif::{ProgressBar, ProgressStyle};

fn theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

/// Asks the user to pick one of `items`. A single item is returned without asking.
pub fn select_one<'a, T, F>(prompt: &str, items: &'a [T], label: F) -> io::Result<Option<&'a T>>
where
    F: Fn(&T) -> String,
{
    match items {
        [] => Ok(None),
        [only] => Ok(Some(only)),
        _ => {
            let labels: Vec<String> = items.iter().map(label).collect();
            let chosen = Select::with_theme(&theme())
                .with_prompt(prompt)
                .items(&labels)
                .default(0)
                .interact_opt()?;
            Ok(chosen.map(|i| &items[i]))
        }
    }
}

pub fn spinner(msg: impl Into<Cow<'static, str>>) -> ProgressBar {
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    let spinner = ProgressBar::new_spinner()
        .with_style(style)
        .with_message(msg);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn trivial_choices_do_not_prompt() {
        let none: [&str; 0] = [];
        assert_eq!(select_one("pick", &none, |s| s.to_string()).unwrap(), None);

        let one = ["main.cpp"];
        assert_eq!(
            select_one("pick", &one, |s| s.to_string()).unwrap(),
            Some(&"main.cpp")
        );
    }
}
