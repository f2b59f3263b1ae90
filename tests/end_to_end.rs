use lcxl3::editor::{self, Direction, Editor, EditorEvent, Outcome, Scripted};
use lcxl3::{assign, factory, store, CcMode, ChannelMode, GeneratorConfig, LedColor, Mode};

fn config(dir: &std::path::Path, count: u8) -> GeneratorConfig {
    GeneratorConfig {
        template_count: count,
        channel_mode: ChannelMode::PerTemplate,
        cc_mode: CcMode::RestartPerTemplate,
        output_prefix: "Synth".to_owned(),
        output_dir: dir.join("outputs"),
        ..Default::default()
    }
}

#[test]
fn generate_write_and_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), 3);

    let templates = assign::generate(&config, factory::image().unwrap()).unwrap();
    let paths = store::write_batch(&config.output_dir, &config.output_prefix, &templates).unwrap();
    assert_eq!(
        paths.iter().map(|p| p.file_name().unwrap().to_str().unwrap()).collect::<Vec<_>>(),
        ["Synth_T01.syx", "Synth_T02.syx", "Synth_T03.syx"]
    );

    let first = store::read_template(&paths[0]).unwrap();
    assert_eq!(first.controls()[0].channel, 0);
    assert_eq!(first.controls()[0].cc, Some(13));

    let second = store::read_template(&paths[1]).unwrap();
    assert_eq!(second.number(), 2);
    assert_eq!(second.controls()[0].channel, 1);
    assert_eq!(second.controls()[0].cc, Some(13));
    assert_eq!(second.controls()[32].mode, Mode::Toggle);
    assert_eq!(second.name(), "New Custom Mode");

    for (path, template) in paths.iter().zip(&templates) {
        assert_eq!(std::fs::read(path).unwrap().len(), 684);
        assert_eq!(std::fs::read(path).unwrap(), template.raw_bytes());
    }
}

#[test]
fn edit_saved_file_keeps_everything_but_colors() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), 2);
    let templates = assign::generate(&config, factory::image().unwrap()).unwrap();
    let paths = store::write_batch(&config.output_dir, &config.output_prefix, &templates).unwrap();

    let path = store::resolve("Synth_T02.syx".as_ref(), &config.output_dir).unwrap();
    assert_eq!(path, paths[1]);
    let before = store::read_template(&path).unwrap();

    let session = Editor::new(before.clone()).unwrap();
    let mut events = Scripted::new([
        EditorEvent::AllOff,
        EditorEvent::Move(Direction::Down),
        EditorEvent::Move(Direction::Down),
        EditorEvent::Move(Direction::Down),
        EditorEvent::CycleColorBack,
        EditorEvent::PaintColumn,
        EditorEvent::Save,
    ]);
    let edited = editor::run_session(session, &mut events).unwrap().saved().unwrap();
    store::write_template(&path, &edited).unwrap();

    let after = store::read_template(&path).unwrap();
    assert_eq!(after.number(), 2);
    for (old, new) in before.controls().iter().zip(after.controls()) {
        assert_eq!((old.cc, old.channel, old.mode), (new.cc, new.channel, new.mode));
        if !new.is_selectable() {
            assert_eq!(new.color, None);
        } else if new.col() == 0 {
            assert_eq!(new.color, Some(LedColor::Pink), "control {}", new.index());
        } else {
            assert_eq!(new.color, Some(LedColor::Off), "control {}", new.index());
        }
    }
}

#[test]
fn cancelled_edit_leaves_the_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), 1);
    let templates = assign::generate(&config, factory::image().unwrap()).unwrap();
    let paths = store::write_batch(&config.output_dir, &config.output_prefix, &templates).unwrap();
    let original = std::fs::read(&paths[0]).unwrap();

    let session = Editor::new(store::read_template(&paths[0]).unwrap()).unwrap();
    let mut events = Scripted::new([EditorEvent::AllOff, EditorEvent::Quit]);
    assert_eq!(
        editor::run_session(session, &mut events).unwrap(),
        Outcome::Cancelled
    );

    assert_eq!(std::fs::read(&paths[0]).unwrap(), original);
}
