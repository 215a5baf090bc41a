use std::{collections::HashMap, path::Path};

use cfkit_webclient::{LocalDateTime, ProblemRef};

pub type Result = std::result::Result<String, PlaceholderError>;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlaceholderError {
    #[error("Undefined placeholder '${{{0}}}' at {}", .1+1)]
    UndefinedVar(String, usize),

    #[error("Unclosed brace (found '${{' at {})", .0+1)]
    UnclosedBrace(usize),
}

/// Values substituted into template scripts: `${name}` is replaced by the
/// value of `name`, `$$` by a single `$`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    vars: HashMap<String, String>,
}

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// The standard set of placeholders for testing `source_file`.
    /// Contest related keys are empty when `target` is unknown.
    pub fn for_source(
        source_file: &Path,
        handle: &str,
        target: Option<&ProblemRef>,
        now: LocalDateTime,
    ) -> Self {
        let file = source_file.to_string_lossy();
        let file_base = match source_file.extension() {
            Some(ext) => file
                .strip_suffix(&format!(".{}", ext.to_string_lossy()))
                .unwrap_or(file.as_ref())
                .to_owned(),
            None => file.to_string(),
        };

        let mut p = Self::new();
        p.set("handle", handle)
            .set("date", now.format("%d-%m-%y").to_string())
            .set("time", now.format("%H:%M:%S").to_string())
            .set("file", file.to_string())
            .set("fileBase", file_base)
            .set(
                "contest",
                target.map(|t| t.contest.to_string()).unwrap_or_default(),
            )
            .set(
                "problem",
                target
                    .and_then(|t| t.index.clone())
                    .unwrap_or_default()
                    .to_lowercase(),
            )
            .set(
                "contClass",
                target
                    .map(|t| t.contest_class().to_string())
                    .unwrap_or_default(),
            );
        p
    }

    pub fn resolve(&self, fmt: &str) -> Result {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        enum State {
            Normal,
            Dollar,
            InsideBrace,
        }
        use State::*;

        let mut state = Normal;
        let mut pos_open_brace = 0;
        let mut res = String::with_capacity(fmt.len() * 2);
        let mut var_name = String::with_capacity(32);

        for (i, c) in fmt.chars().enumerate() {
            match (c, state) {
                ('$', Normal) => {
                    state = Dollar;
                    res.push(c);
                }
                ('$', Dollar) => {
                    state = Normal;
                }
                ('{', Dollar) => {
                    state = InsideBrace;
                    pos_open_brace = i - 1;
                    var_name.clear();
                    res.pop(); // remove '$'
                }
                ('}', InsideBrace) => {
                    state = Normal;
                    let Some(value) = self.vars.get(&var_name) else {
                        return Err(PlaceholderError::UndefinedVar(var_name, pos_open_brace))
                    };
                    res += value;
                }
                (_, InsideBrace) => {
                    var_name.push(c);
                }
                _ => {
                    state = Normal;
                    res.push(c);
                }
            }
        }

        if state == InsideBrace {
            Err(PlaceholderError::UnclosedBrace(pos_open_brace))
        } else {
            res.shrink_to_fit();
            Ok(res)
        }
    }
}

#[cfg(test)]
mod test {
    use cfkit_webclient::ContestId;
    use chrono::TimeZone as _;
    use maplit::hashmap;

    use super::*;

    fn vars() -> Placeholders {
        let map = hashmap! {
            "firstName" => "Liz",
            "lastName" => "Smith",
            "age" => "999",
            "_$%!?" => "wooo",
        };
        let mut p = Placeholders::new();
        for (k, v) in map {
            p.set(k, v);
        }
        p
    }

    #[test]
    fn resolve_ok() {
        let p = vars();
        assert_eq!(p.resolve("hello").unwrap(), "hello");
        assert_eq!(p.resolve("${firstName}").unwrap(), "Liz");
        assert_eq!(p.resolve("${_$%!?}").unwrap(), "wooo");
        assert_eq!(p.resolve("${firstName}${lastName}").unwrap(), "LizSmith");
        assert_eq!(
            p.resolve("firstName=${firstName}, age=${age}").unwrap(),
            "firstName=Liz, age=999"
        );
        assert_eq!(p.resolve("abc {age} xyz").unwrap(), "abc {age} xyz");
        assert_eq!(p.resolve("abc $ {age} xyz").unwrap(), "abc $ {age} xyz");
        assert_eq!(p.resolve("abc $age xyz").unwrap(), "abc $age xyz");
        assert_eq!(p.resolve("abc $${age} xyz").unwrap(), "abc ${age} xyz");
        assert_eq!(p.resolve("echo $$HOME").unwrap(), "echo $HOME");
        assert_eq!(p.resolve("$").unwrap(), "$");
        assert_eq!(p.resolve("$$").unwrap(), "$");
        assert_eq!(p.resolve("$$$").unwrap(), "$$");
    }

    #[test]
    fn resolve_ng() {
        let mut p = Placeholders::new();
        p.set("age", "999");
        assert_eq!(
            p.resolve("${firstName} ${lastName}").unwrap_err(),
            PlaceholderError::UndefinedVar("firstName".to_owned(), 0)
        );
        assert_eq!(
            p.resolve("${age} ${hello").unwrap_err(),
            PlaceholderError::UnclosedBrace(7),
        );
        assert_eq!(
            p.resolve("${age} ${hello").unwrap_err().to_string(),
            "Unclosed brace (found '${' at 8)"
        );
    }

    #[test]
    fn standard_keys_for_source() {
        let now = chrono::Local
            .with_ymd_and_hms(2023, 11, 5, 9, 7, 3)
            .unwrap();
        let target = ProblemRef::new(ContestId::new(1234), Some("c"));
        let p = Placeholders::for_source(Path::new("main.cpp"), "tourist", Some(&target), now);

        assert_eq!(
            p.resolve("g++ ${file} -o ${fileBase}").unwrap(),
            "g++ main.cpp -o main"
        );
        assert_eq!(
            p.resolve("${handle} ${date} ${time}").unwrap(),
            "tourist 05-11-23 09:07:03"
        );
        assert_eq!(
            p.resolve("${contClass}/${contest}/${problem}").unwrap(),
            "contest/1234/c"
        );

        let p = Placeholders::for_source(Path::new("sol.tar.gz"), "", None, now);
        assert_eq!(p.get("fileBase"), Some("sol.tar"));
        assert_eq!(p.get("contest"), Some(""));
    }
}
