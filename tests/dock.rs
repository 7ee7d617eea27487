use docknotes::config::PanelConfig;
use docknotes::display::{ScreenBounds, StaticDisplays};
use docknotes::store::{FileStore, SettingsStore};
use docknotes::{point, rect, Config, Dock, DockCommand, Insets, Orientation, Preferences};
use std::sync::Arc;

fn displays() -> Box<StaticDisplays> {
    Box::new(StaticDisplays::single(ScreenBounds::new(
        rect(0, 0, 1920, 1080),
        Insets::zero(),
    )))
}

#[test]
fn open_panel_follows_a_drag_without_jumps() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("settings.json"), PanelConfig::default());
    let mut prefs = Preferences::default();
    prefs.handle_location = Some(point(300, 500));
    prefs.orientation = Orientation::Vertical;
    prefs.start_minimized = false;
    store.save(&prefs).unwrap();

    let mut dock = Dock::new(&Config::default(), displays(), Arc::new(store));
    dock.dispatch(DockCommand::Start);
    assert!(dock.panel().visible);

    let start = dock.handle().position;
    dock.dispatch(DockCommand::Press(start + docknotes::Offset::new(3, 10)));

    let mut last_panel_x = dock.panel().position.x;
    for step in 1..=250 {
        let pointer = point(start.x + 3 + step * 5, start.y + 10);
        dock.dispatch(DockCommand::Drag(pointer));
        let panel_x = dock.panel().position.x;
        assert!(panel_x >= last_panel_x, "panel moved backwards at step {}", step);
        assert!(panel_x - last_panel_x <= 5, "panel jumped at step {}", step);
        last_panel_x = panel_x;
    }
}

#[test]
fn settled_layout_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let config = Config::default();

    let mut dock = Dock::new(
        &config,
        displays(),
        Arc::new(FileStore::new(&path, config.panel.clone())),
    );
    dock.dispatch(DockCommand::Start);
    dock.dispatch(DockCommand::Press(point(920, 10)));
    dock.dispatch(DockCommand::Drag(point(30, 500)));
    let effects = dock.dispatch(DockCommand::Release(point(30, 500)));
    assert!(effects.saved);
    assert_eq!(dock.handle().orientation, Orientation::Vertical);
    let settled = *dock.handle();

    let restarted = Dock::new(
        &config,
        displays(),
        Arc::new(FileStore::new(&path, config.panel.clone())),
    );
    assert_eq!(restarted.handle().position, settled.position);
    assert_eq!(restarted.handle().orientation, settled.orientation);
    assert_eq!(restarted.handle().size, settled.size);
}

#[test]
fn saved_preferences_decode_to_the_same_values() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("settings.json"), PanelConfig::default());
    let mut prefs = Preferences::default();
    prefs.handle_location = Some(point(4, 395));
    prefs.orientation = Orientation::Vertical;
    prefs.always_on_top = false;
    prefs.set("theme", "light").unwrap();
    prefs.set("font_size", "18").unwrap();

    store.save(&prefs).unwrap();
    let loaded = store.load().unwrap();
    assert_eq!(loaded, prefs);

    store.save(&loaded).unwrap();
    assert_eq!(store.load().unwrap(), prefs);
}

#[test]
fn one_bad_preference_keeps_the_saved_handle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{"handle_location":[4,395],"orientation":"vertical","font_size":-3}"#,
    )
    .unwrap();

    let store = FileStore::new(&path, PanelConfig::default());
    let prefs = store.load().unwrap();
    assert_eq!(prefs.font_size(), 10);

    let dock = Dock::new(&Config::default(), displays(), Arc::new(store));
    assert_eq!(dock.handle().position, point(4, 395));
    assert_eq!(dock.handle().orientation, Orientation::Vertical);
}
