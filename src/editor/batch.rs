//! Editing the LEDs of several template files in a row.
//!
//! Each file is read, handed to an edit function such as [`terminal::edit`](super::terminal::edit)
//! and written back if the edit was saved. When a template is quit or can't be edited, the caller
//! decides whether to go on with the rest. An [`Outcome::Aborted`] session stops the batch without
//! asking.

use std::path::{Path, PathBuf};

use super::Outcome;
use crate::{store, Error, Result, Template};

/// Why a batch paused before the next template
#[derive(Debug)]
pub enum Interruption {
    /// The user quit the template without saving
    Cancelled,
    /// The template couldn't be read, edited or written
    Failed(Error),
}

#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct BatchReport {
    pub saved: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
    /// Templates never opened because the batch was stopped
    pub skipped: Vec<PathBuf>,
}

fn edit_one(path: &Path, edit: &mut impl FnMut(Template) -> Result<Outcome>) -> Result<Outcome> {
    let template = store::read_template(path)?;
    log::info!("editing LEDs of {}", path.display());

    let outcome = edit(template)?;
    if let Outcome::Saved(edited) = &outcome {
        store::write_template(path, edited)?;
    }
    Ok(outcome)
}

/// Edit the files at `paths` one after another.
///
/// `ask_continue` is called after a template was quit or failed, unless it was the last one, and
/// stops the batch by returning `false`. Terminal errors end the batch with an error since no
/// further session could be shown.
pub fn edit_files(
    paths: &[PathBuf],
    mut edit: impl FnMut(Template) -> Result<Outcome>,
    mut ask_continue: impl FnMut(&Interruption) -> Result<bool>,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();

    for (i, path) in paths.iter().enumerate() {
        let remaining = &paths[i + 1..];

        let interruption = match edit_one(path, &mut edit) {
            Ok(Outcome::Saved(_)) => {
                report.saved.push(path.clone());
                continue;
            }
            Ok(Outcome::Cancelled) => {
                report.unchanged.push(path.clone());
                Interruption::Cancelled
            }
            Ok(Outcome::Aborted) => {
                report.unchanged.push(path.clone());
                report.skipped.extend_from_slice(remaining);
                break;
            }
            Err(Error::Terminal(e)) => return Err(Error::Terminal(e)),
            Err(e) => {
                log::error!("couldn't edit {}: {}", path.display(), e);
                report.failed.push(path.clone());
                Interruption::Failed(e)
            }
        };

        if !remaining.is_empty() && !ask_continue(&interruption)? {
            report.skipped.extend_from_slice(remaining);
            break;
        }
    }

    if !report.skipped.is_empty() {
        log::info!("stopped before {} templates", report.skipped.len());
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{run_session, Editor, EditorEvent, Scripted};
    use crate::{assign, GeneratorConfig, LedColor};
    use std::fs;

    use EditorEvent::*;

    fn written(dir: &Path, count: u8) -> Vec<PathBuf> {
        let config = GeneratorConfig {
            template_count: count,
            ..Default::default()
        };
        let templates = assign::generate(&config, crate::factory::image().unwrap()).unwrap();
        store::write_batch(dir, "Batch", &templates).unwrap()
    }

    /// An edit function replaying one event script per template
    fn scripted(scripts: Vec<Vec<EditorEvent>>) -> impl FnMut(Template) -> Result<Outcome> {
        let mut scripts = scripts.into_iter();
        move |template| {
            let events = scripts.next().expect("more edits than scripts");
            run_session(Editor::new(template)?, &mut Scripted::new(events))
        }
    }

    fn contents(paths: &[PathBuf]) -> Vec<Vec<u8>> {
        paths.iter().map(|path| fs::read(path).unwrap()).collect()
    }

    #[test]
    fn saved_edits_are_written_without_asking() {
        let dir = tempfile::tempdir().unwrap();
        let paths = written(dir.path(), 2);

        let report = edit_files(
            &paths,
            scripted(vec![vec![AllOff, Save], vec![Save]]),
            |_| panic!("nothing to ask about"),
        )
        .unwrap();

        assert_eq!(report.saved, paths);
        let first = store::read_template(&paths[0]).unwrap();
        assert!(first.controls().iter().all(|c| c.color.map_or(true, |c| c == LedColor::Off)));
    }

    #[test]
    fn declining_after_a_quit_stops_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let paths = written(dir.path(), 3);
        let before = contents(&paths);

        let mut asked = 0;
        let report = edit_files(&paths, scripted(vec![vec![AllOff, Quit]]), |interruption| {
            asked += 1;
            assert!(matches!(interruption, Interruption::Cancelled));
            Ok(false)
        })
        .unwrap();

        assert_eq!(asked, 1);
        assert_eq!(report.unchanged, &paths[..1]);
        assert_eq!(report.skipped, &paths[1..]);
        assert!(report.saved.is_empty());
        assert_eq!(contents(&paths), before);
    }

    #[test]
    fn accepting_after_a_quit_goes_on() {
        let dir = tempfile::tempdir().unwrap();
        let paths = written(dir.path(), 3);

        let mut asked = 0;
        let report = edit_files(
            &paths,
            scripted(vec![vec![Quit], vec![AllOff, Save], vec![Quit]]),
            |_| {
                asked += 1;
                Ok(true)
            },
        )
        .unwrap();

        // No question after the last template
        assert_eq!(asked, 1);
        assert_eq!(report.saved, &paths[1..2]);
        assert_eq!(report.unchanged, vec![paths[0].clone(), paths[2].clone()]);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn abort_stops_without_asking() {
        let dir = tempfile::tempdir().unwrap();
        let paths = written(dir.path(), 3);
        let before = contents(&paths);

        let report = edit_files(&paths, scripted(vec![vec![CycleColor, Abort]]), |_| {
            panic!("abort must not ask")
        })
        .unwrap();

        assert_eq!(report.unchanged, &paths[..1]);
        assert_eq!(report.skipped, &paths[1..]);
        assert_eq!(contents(&paths), before);
    }

    #[test]
    fn a_broken_file_asks_before_going_on() {
        let dir = tempfile::tempdir().unwrap();
        let paths = written(dir.path(), 3);
        fs::write(&paths[0], b"not a template").unwrap();

        let mut failures = Vec::new();
        let report = edit_files(
            &paths,
            scripted(vec![vec![Save], vec![Save]]),
            |interruption| {
                if let Interruption::Failed(e) = interruption {
                    failures.push(e.to_string());
                }
                Ok(true)
            },
        )
        .unwrap();

        assert_eq!(failures.len(), 1);
        assert_eq!(report.failed, &paths[..1]);
        assert_eq!(report.saved, &paths[1..]);

        let mut answers = [false].into_iter();
        let report = edit_files(&paths, scripted(vec![]), |_| Ok(answers.next().unwrap())).unwrap();
        assert_eq!(report.failed, &paths[..1]);
        assert_eq!(report.skipped, &paths[1..]);
    }

    #[test]
    fn terminal_errors_end_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let paths = written(dir.path(), 2);

        let result = edit_files(
            &paths,
            |_| {
                Err(Error::Terminal(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "not a terminal",
                )))
            },
            |_| panic!("a dead terminal must not ask"),
        );
        assert!(matches!(result, Err(Error::Terminal(_))));
    }
}
