//! Хук прогресса, вызываемый на границах фаз.
//!
//! Ядро только сообщает о ходе работы; ответ репортёра ни на что не влияет.

/// Группа сообщений перебора пар хабов магистральной сети.
pub const GROUP_TRUNK: &str = "trunk";
/// Группа сообщений привязки ярусов.
pub const GROUP_AFFILIATION: &str = "affiliation";

pub trait Reporter {
    fn report(&self, message: &str, group: Option<&str>);
}

impl<F> Reporter for F
where
    F: Fn(&str, Option<&str>),
{
    fn report(&self, message: &str, group: Option<&str>) {
        self(message, group);
    }
}

/// Пишет прогресс в `tracing` на уровне `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, message: &str, group: Option<&str>) {
        match group {
            Some(group) => tracing::info!(group, "{message}"),
            None => tracing::info!("{message}"),
        }
    }
}

/// Молчаливый репортёр для тестов и встраивания.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _message: &str, _group: Option<&str>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn closures_are_reporters() {
        let seen = RefCell::new(Vec::new());
        let reporter = |message: &str, group: Option<&str>| {
            seen.borrow_mut()
                .push((message.to_string(), group.map(str::to_string)));
        };
        reporter.report("done", Some(GROUP_TRUNK));
        reporter.report("all", None);
        assert_eq!(
            *seen.borrow(),
            vec![
                ("done".to_string(), Some("trunk".to_string())),
                ("all".to_string(), None)
            ]
        );
    }
}
