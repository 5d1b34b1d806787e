//! End-to-end properties of the lottery and grouping engines through the
//! public API: import → draw/reset → group → export.

use std::collections::HashSet;

use draw_engine::{
    DrawError, ExportFormat, FallbackNamer, GroupingEngine, ImportSource, LotteryEngine, Roster,
    Session, SessionSettings, View, SAMPLE_NAMES,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn sample_roster_drains_completely_then_rejects() {
    let mut session = Session::seeded(SessionSettings::default(), 42);
    session.import(&ImportSource::Sample).unwrap();
    session.switch_view(View::Lottery).unwrap();

    let mut winners = HashSet::new();
    for i in 0..SAMPLE_NAMES.len() {
        let before = session.lottery().remaining();
        let winner = session.draw(&format!("Prize {i}")).unwrap();
        assert_eq!(session.lottery().remaining(), before - 1);
        assert!(winners.insert(winner.id), "{} won twice", winner.name);
    }

    assert_eq!(session.draw("one more"), Err(DrawError::EmptyPool));
    assert_eq!(session.lottery().history().len(), SAMPLE_NAMES.len());
    assert_eq!(
        session.lottery().history()[0].prize_label,
        format!("Prize {}", SAMPLE_NAMES.len() - 1)
    );

    session.reset_lottery();
    assert_eq!(session.lottery().remaining(), SAMPLE_NAMES.len());
    assert!(session.lottery().history().is_empty());
}

#[test]
fn same_name_different_people_stay_eligible() {
    let roster = Roster::from_names(["Chris", "Chris", "Jo"]);
    let chris_ids: Vec<_> = roster
        .participants()
        .iter()
        .filter(|p| p.name == "Chris")
        .map(|p| p.id)
        .collect();

    // Try several seeds so that at least one run draws a Chris first.
    for seed in 0..16 {
        let mut lottery =
            LotteryEngine::with_rng(roster.participants(), ChaCha8Rng::seed_from_u64(seed));
        let first = lottery.draw("").unwrap();
        if first.name != "Chris" {
            continue;
        }
        let other = chris_ids.iter().find(|id| **id != first.id).unwrap();
        assert!(lottery.pool().iter().any(|p| p.id == *other));
        return;
    }
    panic!("no seed drew a Chris first");
}

#[test]
fn dedup_collapses_names_while_draws_key_by_id() {
    let mut session = Session::seeded(SessionSettings::default(), 5);
    session
        .import(&ImportSource::Text("Chris;Chris;Jo".into()))
        .unwrap();
    assert_eq!(session.roster().duplicate_names(), vec!["Chris"]);

    session.draw("").unwrap();
    assert_eq!(session.lottery().remaining(), 2);

    assert_eq!(session.dedup_roster(), 1);
    assert_eq!(session.roster().names(), vec!["Chris", "Jo"]);
    assert_eq!(session.lottery().remaining(), 2);
    assert!(session.lottery().history().is_empty());
}

#[tokio::test]
async fn five_people_pairs_export() {
    let roster = Roster::from_names(["A", "B", "C", "D", "E"]);
    let mut grouping = GroupingEngine::with_rng(ChaCha8Rng::seed_from_u64(1));
    let groups = grouping
        .generate_groups(&roster.names(), 2, &FallbackNamer)
        .await
        .unwrap();

    let mut sizes: Vec<usize> = groups.iter().map(|g| g.members.len()).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![1, 2, 2]);

    let seen: HashSet<&str> = groups
        .iter()
        .flat_map(|g| g.members.iter().map(String::as_str))
        .collect();
    let expected: HashSet<&str> = ["A", "B", "C", "D", "E"].into_iter().collect();
    assert_eq!(seen, expected);

    let text = draw_engine::export::render(&groups, ExportFormat::Text);
    assert_eq!(text.matches("\n\n").count(), 2);
    assert!(text.starts_with("Team 1:\n"));

    let csv = draw_engine::export::render(&groups, ExportFormat::Csv);
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.starts_with("\u{feff}group_name,members\n"));
}

#[tokio::test]
async fn session_groups_the_imported_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("staff.csv");
    std::fs::write(&path, "Ada,Grace\nLinus;Ken\n\nBarbara\r\nDennis\n").unwrap();

    let mut session = Session::seeded(
        SessionSettings {
            use_ai_names: false,
            group_size: 4,
            ..Default::default()
        },
        9,
    );
    assert_eq!(session.import(&ImportSource::File(path)).unwrap(), 6);
    assert_eq!(session.planned_groups(), 2);

    let groups = session.generate_groups(&FallbackNamer).await.unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].members.len(), 4);
    assert_eq!(groups[1].members.len(), 2);

    let out = dir.path().join(ExportFormat::Csv.default_file_name());
    draw_engine::export::write_export(&out, session.groups(), ExportFormat::Csv).unwrap();
    let written = std::fs::read_to_string(out).unwrap();
    assert!(written.contains("Team 2,\""));
}
