use proptest::prelude::*;
use scribe_artifact::{Artifact, Board, ContentVariant, Direction};

fn artifact_with(bodies: &[String]) -> Artifact {
    let mut artifact = Artifact::new(ContentVariant::text("doc", bodies[0].clone()));
    for body in &bodies[1..] {
        artifact = artifact
            .append_version(ContentVariant::text("doc", body.clone()))
            .unwrap();
    }
    artifact
}

fn note_line(i: usize, x: i32, y: i32) -> String {
    format!(r##"{{"title":"note {i}","content":"c{i}","x":{x},"y":{y},"color":"#fff"}}"##)
}

proptest! {
    #[test]
    fn prop_get_current_defined_for_any_pointer(
        bodies in proptest::collection::vec(".{0,8}", 1..6),
        pointer in 0u32..20,
    ) {
        let built = artifact_with(&bodies);
        let artifact = Artifact::from_parts(pointer, built.contents().to_vec()).unwrap();
        let current = artifact.get_current();
        prop_assert!(current.is_some());
        if artifact.get(pointer).is_none() {
            prop_assert_eq!(current, artifact.contents().last());
        }
    }

    #[test]
    fn prop_append_is_index_monotonic(bodies in proptest::collection::vec(".{0,8}", 1..8)) {
        let artifact = artifact_with(&bodies);
        let n = artifact.max_index();
        let appended = artifact
            .append_version(ContentVariant::text("doc", "next"))
            .unwrap();
        prop_assert_eq!(appended.max_index(), n + 1);
        prop_assert_eq!(appended.current_index(), n + 1);
        prop_assert_eq!(appended.get_current().unwrap().index(), n + 1);
    }

    #[test]
    fn prop_navigate_boundaries_noop(bodies in proptest::collection::vec(".{0,8}", 1..6)) {
        let last = artifact_with(&bodies);
        prop_assert_eq!(last.navigate(Direction::Forward, false), last.clone());

        let mut first = last.clone();
        for _ in 0..bodies.len() {
            first = first.navigate(Direction::Back, false);
        }
        prop_assert_eq!(first.current_index(), 1);
        prop_assert_eq!(first.navigate(Direction::Back, false), first.clone());
    }

    #[test]
    fn prop_board_round_trip(
        coords in proptest::collection::vec((-500i32..500, -500i32..500), 1..10),
        pick in any::<prop::sample::Index>(),
        new_x in 0i32..1000,
    ) {
        let lines: Vec<String> = coords
            .iter()
            .enumerate()
            .map(|(i, (x, y))| note_line(i, *x, *y))
            .collect();
        let source = lines.join("\n");

        let board = Board::parse(&source);
        prop_assert_eq!(board.len(), lines.len());
        prop_assert_eq!(board.to_ndjson().unwrap(), source.clone());

        let target = pick.index(lines.len());
        let mut moved = board.clone();
        moved.move_note(target, f64::from(new_x), 7.0).unwrap();
        let out = moved.to_ndjson().unwrap();
        let out_lines: Vec<&str> = out.split('\n').collect();
        prop_assert_eq!(out_lines.len(), lines.len());
        for (i, line) in out_lines.iter().enumerate() {
            if i == target {
                prop_assert_eq!(*line, note_line(i, new_x, 7));
            } else {
                prop_assert_eq!(*line, lines[i].as_str());
            }
        }
    }
}
