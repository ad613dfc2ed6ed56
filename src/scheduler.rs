//! Dependency-ordered processing of the registry.
//!
//! A file's hashed name depends on the hashed names of everything it
//! references, so a file may only be processed once all of its targets have
//! been. The scheduler makes repeated passes over the unprocessed files,
//! processing each one that is ready, until nothing is left. A pass that
//! processes nothing while files remain means the references form a cycle,
//! which is reported instead of retried.

use crate::error::{MarkError, Result};
use crate::logging::Logger;
use crate::registry::{Registry, SourceFile};

/// Summary of a completed schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScheduleStats {
    /// Number of full passes over the pending files.
    pub passes: usize,
    /// Number of files processed.
    pub processed: usize,
}

/// Processes every file in `registry` exactly once, dependencies first.
///
/// `process` receives a ready file and the registry (in which every target of
/// that file already has a hashed path) and returns the file's hashed path,
/// which is recorded before the next file is considered. Files within a pass
/// are visited in path order.
///
/// # Errors
///
/// Returns [`MarkError::DependencyCycle`] if a pass makes no progress, and
/// propagates the first error returned by `process`.
pub fn schedule<F>(registry: &mut Registry, log: &Logger, mut process: F) -> Result<ScheduleStats>
where
    F: FnMut(&SourceFile, &Registry) -> Result<String>,
{
    let mut pending = registry.paths();
    let mut stats = ScheduleStats::default();

    while !pending.is_empty() {
        stats.passes += 1;
        let before = pending.len();
        let mut waiting = Vec::new();

        for path in pending {
            let file = registry
                .get(&path)
                .ok_or_else(|| MarkError::InvalidPath {
                    message: format!("'{path}' disappeared from the registry"),
                })?;

            if !registry.is_ready(file) {
                waiting.push(path);
                continue;
            }

            let hashed_path = process(file, registry)?;
            registry.assign_hashed_path(&path, hashed_path)?;
            stats.processed += 1;
        }

        let done = before - waiting.len();
        log.verbose(
            1,
            format!(
                "Pass {}: processed {done} file(s), {} waiting",
                stats.passes,
                waiting.len()
            ),
        );

        if done == 0 {
            return Err(MarkError::DependencyCycle { files: waiting });
        }

        pending = waiting;
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Reference;

    fn file(path: &str, targets: &[&str]) -> SourceFile {
        let references = targets
            .iter()
            .enumerate()
            .map(|(i, target)| Reference {
                position: i * 10,
                length: 5,
                target: target.to_string(),
                suffix: String::new(),
            })
            .collect();
        SourceFile::new(path, references)
    }

    fn registry(files: Vec<SourceFile>) -> Registry {
        let mut registry = Registry::new();
        for file in files {
            registry.insert(file);
        }
        registry
    }

    fn fake_hash(file: &SourceFile) -> String {
        format!("{}.h", file.path())
    }

    #[test]
    fn test_chain_processes_dependencies_first() {
        // a -> b -> c; path order would visit a first.
        let mut registry = registry(vec![
            file("a.css", &["b.css"]),
            file("b.css", &["c.png"]),
            file("c.png", &[]),
        ]);

        let mut order = Vec::new();
        let stats = schedule(&mut registry, &Logger::default(), |file, registry| {
            for reference in file.references() {
                assert!(registry.hashed_path(&reference.target).is_some());
            }
            order.push(file.path().to_string());
            Ok(fake_hash(file))
        })
        .unwrap();

        assert_eq!(order, vec!["c.png", "b.css", "a.css"]);
        assert_eq!(stats.processed, 3);
        assert_eq!(stats.passes, 3);
        assert_eq!(registry.hashed_path("a.css"), Some("a.css.h"));
    }

    #[test]
    fn test_ready_files_processed_in_same_pass() {
        let mut registry = registry(vec![
            file("a.png", &[]),
            file("b.css", &["a.png"]),
            file("c.txt", &[]),
        ]);

        let stats = schedule(&mut registry, &Logger::default(), |file, _| Ok(fake_hash(file)))
            .unwrap();

        assert_eq!(stats.passes, 1);
        assert_eq!(stats.processed, 3);
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut registry = registry(vec![
            file("a.css", &["b.css"]),
            file("b.css", &["a.css"]),
            file("c.png", &[]),
        ]);

        let result = schedule(&mut registry, &Logger::default(), |file, _| Ok(fake_hash(file)));

        match result {
            Err(MarkError::DependencyCycle { files }) => {
                assert_eq!(files, vec!["a.css", "b.css"]);
            }
            other => panic!("expected a dependency cycle, got {other:?}"),
        }
        assert_eq!(registry.hashed_path("c.png"), Some("c.png.h"));
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let mut registry = registry(vec![file("a.css", &["a.css"])]);
        let result = schedule(&mut registry, &Logger::default(), |file, _| Ok(fake_hash(file)));
        assert!(matches!(result, Err(MarkError::DependencyCycle { .. })));
    }

    #[test]
    fn test_file_depending_on_cycle_is_stuck() {
        let mut registry = registry(vec![
            file("a.css", &["b.css"]),
            file("b.css", &["a.css"]),
            file("main.css", &["a.css"]),
        ]);
        let result = schedule(&mut registry, &Logger::default(), |file, _| Ok(fake_hash(file)));

        match result {
            Err(MarkError::DependencyCycle { files }) => {
                assert_eq!(files, vec!["a.css", "b.css", "main.css"]);
            }
            other => panic!("expected a dependency cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_registry() {
        let mut registry = Registry::new();
        let stats = schedule(&mut registry, &Logger::default(), |file, _| Ok(fake_hash(file)))
            .unwrap();
        assert_eq!(stats, ScheduleStats::default());
    }

    #[test]
    fn test_processor_error_aborts() {
        let mut registry = registry(vec![file("a.png", &[]), file("b.png", &[])]);

        let mut calls = 0;
        let result = schedule(&mut registry, &Logger::default(), |file, _| {
            calls += 1;
            Err(MarkError::InvalidPath {
                message: file.path().to_string(),
            })
        });

        assert!(matches!(result, Err(MarkError::InvalidPath { .. })));
        assert_eq!(calls, 1);
        assert!(registry.mapping().is_empty());
    }
}
