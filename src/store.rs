//! Reading and writing template files.
//!
//! Every write goes to a temporary sibling first and is renamed into place, so a template file is
//! either the old one or the complete new one. A batch is all-or-nothing: if any file of a
//! generation pass can't be written, the files that pass already put in place are removed again.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{sysex, validate, Error, Result, Template};

/// File extension of template files
pub const EXTENSION: &str = "syx";

/// `prefix_Tnn.syx`, with the template number zero-padded to two digits
pub fn file_name(prefix: &str, number: u8) -> String {
    format!("{}_T{:02}.{}", prefix, number, EXTENSION)
}

/// Template number encoded in a file name like `Serum_T03.syx`, if there is one
pub fn template_number(path: &Path) -> Option<u8> {
    let stem = path.file_stem()?.to_str()?;
    let (_, digits) = stem.rsplit_once("_T")?;
    if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|&n| n > 0)
}

/// Resolve a template file the way the `leds` command accepts it: as given if it exists,
/// otherwise relative to the output directory.
pub fn resolve(target: &Path, output_dir: &Path) -> Result<PathBuf> {
    if target.is_file() {
        return Ok(target.to_path_buf());
    }
    if target.is_relative() {
        let candidate = output_dir.join(target);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    Err(Error::io(
        target,
        std::io::Error::new(std::io::ErrorKind::NotFound, "template file not found"),
    ))
}

/// Read, decode and validate a template file
pub fn read_template(path: &Path) -> Result<Template> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    let mut template = sysex::decode(&bytes)?;
    if let Some(number) = template_number(path) {
        template.set_number(number);
    }
    validate::template(&template)?;

    log::debug!("read template {} from {:?}", template.number(), path);
    Ok(template)
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn discard(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            log::warn!("couldn't clean up {:?}: {}", path, e);
        }
    }
}

/// Rename `staged` over `path`, logging at `overwrite` if that replaces a file
fn publish(staged: &Path, path: &Path, overwrite: log::Level) -> Result<()> {
    if path.exists() {
        log::log!(overwrite, "overwriting existing file {:?}", path);
    }
    fs::rename(staged, path).map_err(|e| Error::io(path, e))
}

/// Encode a template and atomically write it to `path`. Replacing an existing file is expected
/// here, as when saving an edit, and only logged at debug level.
pub fn write_template(path: &Path, template: &Template) -> Result<()> {
    let bytes = sysex::encode(template)?;
    validate::structure(&bytes)?;

    let staged = staging_path(path);
    fs::write(&staged, &bytes).map_err(|e| Error::io(&staged, e))?;
    if let Err(e) = publish(&staged, path, log::Level::Debug) {
        discard(&[staged]);
        return Err(e);
    }

    log::debug!("wrote {} bytes to {:?}", bytes.len(), path);
    Ok(())
}

/// Write the output of one generation pass to `dir`, creating it if needed.
///
/// All templates are validated and encoded before the first byte reaches the disk. Returns the
/// written paths in template order.
pub fn write_batch(dir: &Path, prefix: &str, templates: &[Template]) -> Result<Vec<PathBuf>> {
    validate::batch(templates)?;
    let images = templates
        .iter()
        .map(|t| Ok((dir.join(file_name(prefix, t.number())), sysex::encode(t)?)))
        .collect::<Result<Vec<_>>>()?;

    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    let mut staged = Vec::with_capacity(images.len());
    for (path, bytes) in &images {
        let staging = staging_path(path);
        if let Err(e) = fs::write(&staging, bytes) {
            discard(&staged);
            return Err(Error::io(staging, e));
        }
        staged.push(staging);
    }

    let mut written = Vec::with_capacity(images.len());
    for (i, (path, bytes)) in images.iter().enumerate() {
        if let Err(e) = publish(&staged[i], path, log::Level::Warn) {
            log::error!("rolling back {} already written templates", written.len());
            discard(&staged[i..]);
            discard(&written);
            return Err(e);
        }
        log::debug!("wrote {} bytes to {:?}", bytes.len(), path);
        written.push(path.clone());
    }

    log::info!("wrote {} templates to {:?}", written.len(), dir);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assign, GeneratorConfig, LedColor};
    use std::sync::Mutex;

    fn generated(count: u8) -> Vec<Template> {
        let config = GeneratorConfig {
            template_count: count,
            ..Default::default()
        };
        assign::generate(&config, crate::factory::image().unwrap()).unwrap()
    }

    #[test]
    fn file_names_are_zero_padded() {
        assert_eq!(file_name("Serum", 3), "Serum_T03.syx");
        assert_eq!(file_name("X", 15), "X_T15.syx");
    }

    #[test]
    fn template_number_parses_file_names() {
        assert_eq!(template_number(Path::new("out/Serum_T03.syx")), Some(3));
        assert_eq!(template_number(Path::new("My_Synth_T12.syx")), Some(12));
        assert_eq!(template_number(Path::new("Serum_T3.syx")), None);
        assert_eq!(template_number(Path::new("Serum_T00.syx")), None);
        assert_eq!(template_number(Path::new("whatever.syx")), None);
    }

    #[test]
    fn batch_writes_every_template() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/outputs");
        let templates = generated(3);

        let paths = write_batch(&out, "Test", &templates).unwrap();
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[1], out.join("Test_T02.syx"));

        for (path, template) in paths.iter().zip(&templates) {
            assert_eq!(fs::read(path).unwrap(), template.raw_bytes());
            assert_eq!(read_template(path).unwrap().number(), template.number());
        }
        let leftovers: Vec<_> = fs::read_dir(&out)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn invalid_batch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("outputs");
        let mut templates = generated(3);
        templates[2].control_mut(4).unwrap().cc = Some(127);

        assert!(matches!(
            write_batch(&out, "Test", &templates),
            Err(Error::OutOfRangeValue { template: 3, control: 4, .. })
        ));
        assert!(!out.exists());
    }

    #[test]
    fn failed_batch_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let templates = generated(3);
        // A directory where the second file should go makes its rename fail
        fs::create_dir(dir.path().join("Test_T02.syx")).unwrap();

        assert!(matches!(
            write_batch(dir.path(), "Test", &templates),
            Err(Error::Io { .. })
        ));
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["Test_T02.syx".to_owned()]);
    }

    #[test]
    fn single_write_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Edit_T07.syx");
        let mut template = generated(1).remove(0);
        template.control_mut(10).unwrap().color = Some(LedColor::Pink);

        write_template(&path, &template).unwrap();
        let read = read_template(&path).unwrap();
        assert_eq!(read.number(), 7);
        assert_eq!(read.control(10).unwrap().color, Some(LedColor::Pink));
    }

    struct Recorder(Mutex<Vec<(log::Level, String)>>);

    impl log::Log for Recorder {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            let message = record.args().to_string();
            self.0.lock().unwrap().push((record.level(), message));
        }

        fn flush(&self) {}
    }

    static RECORDER: Recorder = Recorder(Mutex::new(Vec::new()));

    #[test]
    fn only_batches_warn_about_overwriting() {
        let _ = log::set_logger(&RECORDER);
        log::set_max_level(log::LevelFilter::Trace);

        let dir = tempfile::tempdir().unwrap();
        let templates = generated(1);
        let paths = write_batch(dir.path(), "Again", &templates).unwrap();
        write_template(&paths[0], &templates[0]).unwrap();
        write_batch(dir.path(), "Again", &templates).unwrap();

        let expected = format!("overwriting existing file {:?}", paths[0]);
        let levels: Vec<_> = RECORDER
            .0
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, message)| *message == expected)
            .map(|&(level, _)| level)
            .collect();
        assert_eq!(levels, [log::Level::Debug, log::Level::Warn]);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn reading_garbage_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.syx");
        fs::write(&path, b"not a template").unwrap();
        assert!(matches!(read_template(&path), Err(Error::MalformedTemplate { .. })));
        assert!(matches!(
            read_template(&dir.path().join("missing.syx")),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn resolve_falls_back_to_the_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Test_T01.syx");
        fs::write(&path, b"").unwrap();

        assert_eq!(resolve(Path::new("Test_T01.syx"), dir.path()).unwrap(), path);
        assert_eq!(resolve(&path, Path::new("/nonexistent")).unwrap(), path);
        assert!(resolve(Path::new("Nope_T01.syx"), dir.path()).is_err());
    }
}
