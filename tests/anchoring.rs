use docknotes::anchor::{AnchoringEngine, Edge, StackSide};
use docknotes::display::ScreenBounds;
use docknotes::{point, rect, size, Config, Insets, Orientation, Rect};

fn screens() -> Vec<ScreenBounds> {
    vec![
        ScreenBounds::new(rect(0, 0, 1920, 1080), Insets::zero()),
        ScreenBounds::new(rect(0, 0, 1440, 900), Insets::new(25, 0, 70, 0)),
        ScreenBounds::new(rect(-1280, -200, 1280, 1024), Insets::new(0, 10, 0, 40)),
    ]
}

fn inside(r: Rect, bounds: Rect) -> bool {
    r.min_x() >= bounds.min_x()
        && r.min_y() >= bounds.min_y()
        && r.max_x() <= bounds.max_x()
        && r.max_y() <= bounds.max_y()
}

fn handle_positions(screen: &ScreenBounds) -> Vec<docknotes::Point> {
    let b = screen.bounds;
    let mut out = Vec::new();
    for x in (b.min_x() - 300..=b.max_x() + 300).step_by(97) {
        for y in (b.min_y() - 300..=b.max_y() + 300).step_by(61) {
            out.push(point(x, y));
        }
    }
    out
}

#[test]
fn every_result_stays_inside_usable_bounds() {
    let engine = AnchoringEngine::new(&Config::default());
    let panel_sizes = [size(200, 160), size(200, 300), size(420, 520)];

    for screen in screens() {
        let usable = screen.usable();
        for origin in handle_positions(&screen) {
            for orientation in [Orientation::Horizontal, Orientation::Vertical] {
                let handle = Rect::new(origin, engine.handle_size(orientation));

                let snap = engine.edge_snap(handle, &screen);
                assert!(inside(snap.handle, usable), "snap {:?} from {:?}", snap, handle);

                assert!(inside(engine.fit(handle, &screen), usable));

                for panel_size in panel_sizes {
                    let stack = engine.stacked_layout(handle, orientation, &screen, panel_size);
                    assert!(inside(stack.handle, usable), "stack {:?} from {:?}", stack, handle);
                    assert!(inside(Rect::new(stack.panel, panel_size), usable));

                    let followed = engine.follow_drag(handle, &screen, panel_size, stack.side);
                    assert!(inside(Rect::new(followed, panel_size), usable));
                }
            }
        }
    }
}

#[test]
fn snapped_orientation_matches_edge() {
    let engine = AnchoringEngine::new(&Config::default());
    for screen in screens() {
        for origin in handle_positions(&screen) {
            let handle = Rect::new(origin, size(90, 28));
            let snap = engine.edge_snap(handle, &screen);
            let expected = match snap.edge {
                Edge::Left | Edge::Right => Orientation::Vertical,
                Edge::Top | Edge::Bottom => Orientation::Horizontal,
            };
            assert_eq!(snap.orientation, expected);
            assert_eq!(snap.handle.size, engine.handle_size(expected));
        }
    }
}

#[test]
fn snapping_twice_changes_nothing() {
    let engine = AnchoringEngine::new(&Config::default());
    for screen in screens() {
        for origin in handle_positions(&screen) {
            let first = engine.edge_snap(Rect::new(origin, size(90, 28)), &screen);
            let second = engine.edge_snap(first.handle, &screen);
            assert_eq!(first, second);
        }
    }
}

#[test]
fn handle_near_top_centre_snaps_to_top() {
    let engine = AnchoringEngine::new(&Config::default());
    let screen = ScreenBounds::new(rect(0, 0, 1920, 1080), Insets::zero());

    let snap = engine.edge_snap(rect(960, 5, 90, 28), &screen);
    assert_eq!(snap.edge, Edge::Top);
    assert_eq!(snap.orientation, Orientation::Horizontal);
    assert_eq!(snap.handle.origin, point(960, 4));
}

#[test]
fn handle_four_from_left_turns_vertical() {
    let engine = AnchoringEngine::new(&Config::default());
    let screen = ScreenBounds::new(rect(0, 0, 1920, 1080), Insets::zero());

    let snap = engine.edge_snap(rect(4, 200, 90, 28), &screen);
    assert_eq!(snap.orientation, Orientation::Vertical);
    assert_eq!(snap.handle.origin.x, 4);
}

#[test]
fn vertical_stack_left_of_centre_is_adjacent() {
    let config = Config::default();
    let engine = AnchoringEngine::new(&config);
    for screen in screens() {
        let usable = screen.usable();
        let handle = Rect::new(
            point(usable.min_x() + 100, usable.center().y),
            engine.handle_size(Orientation::Vertical),
        );
        let panel = size(200, 300);

        let stack = engine.stacked_layout(handle, Orientation::Vertical, &screen, panel);
        assert_eq!(stack.side, StackSide::Left);
        assert_eq!(stack.panel.x + panel.width + config.stack.gap, stack.handle.origin.x);
    }
}
