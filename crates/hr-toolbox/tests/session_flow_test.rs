use std::io::Write;

use draw_engine::{FallbackNamer, Session, SessionSettings};
use hr_toolbox::repl::Repl;
use hr_toolbox::reveal::RevealTiming;

fn repl(seed: u64) -> Repl {
    Repl::new(
        Session::seeded(SessionSettings::default(), seed),
        Box::new(FallbackNamer),
        RevealTiming::instant(),
    )
}

#[tokio::test]
async fn import_group_and_export_from_a_script() {
    let dir = tempfile::tempdir().unwrap();
    let names = dir.path().join("staff.csv");
    let export = dir.path().join("teams.csv");
    let mut file = std::fs::File::create(&names).unwrap();
    write!(file, "\u{feff}Ada,Ken\r\nBo;Cy\nDee\n\nEd, Ada").unwrap();

    let script = format!(
        "import {}\nroster\ndedup\nai off\nview grouping\ngroup 3\nexport csv {}\nquit\n",
        names.display(),
        export.display()
    );
    let mut repl = repl(8);
    let mut out = Vec::new();
    repl.run(script.as_bytes(), &mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Added 7, roster now 7"));
    assert!(text.contains("1 duplicated name(s): Ada"));
    assert!(text.contains("Removed 1 duplicate(s)"));
    assert!(text.contains("Now in grouping view"));

    let groups = repl.session().groups();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups.iter().map(|g| g.members.len()).sum::<usize>(), 6);

    let csv = std::fs::read_to_string(&export).unwrap();
    assert!(csv.starts_with('\u{feff}'));
    assert!(csv.contains("Team 1,\""));
    assert_eq!(csv.lines().count(), 3);
}

#[tokio::test]
async fn clearing_the_roster_returns_to_names() {
    let mut repl = repl(1);
    let mut out = Vec::new();
    repl.run(
        "sample\nview lottery\ndraw Mug\nclear\nstatus\nview lottery\n".as_bytes(),
        &mut out,
    )
    .await
    .unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Mug: "));
    assert!(text.contains("view: names  roster: 0  pool: 0 / 0"));
    assert!(text.contains("The lottery view needs at least one participant"));
    assert!(repl.session().lottery().history().is_empty());
}
