//! Integration tests for CSV roster import and leaderboard export.

use doubles_league_web::roster::{import_roster, leaderboard_csv, RosterError};
use doubles_league_web::{League, LeagueError};

#[test]
fn import_reads_name_and_level() {
    let mut league = League::new("Club", 1).unwrap();
    let csv = "name,level\nAlice,3\n Bob , 1\nCarol,2\n";
    assert_eq!(import_roster(&mut league, csv.as_bytes()).unwrap(), 3);
    let names: Vec<&str> = league.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Alice", "Bob", "Carol"]);
    assert_eq!(league.players[1].level, 1);
    assert!(league.players.iter().all(|p| p.active));
}

#[test]
fn import_honours_active_column() {
    let mut league = League::new("Club", 1).unwrap();
    let csv = "name,level,active\nAlice,3,true\nBob,1,false\n";
    import_roster(&mut league, csv.as_bytes()).unwrap();
    assert!(league.players[0].active);
    assert!(!league.players[1].active);
}

#[test]
fn import_is_all_or_nothing() {
    let mut league = League::new("Club", 1).unwrap();
    league.add_player("Alice", 2).unwrap();
    let csv = "name,level\nBob,1\nalice,4\n";
    match import_roster(&mut league, csv.as_bytes()) {
        Err(RosterError::Row { line, error }) => {
            assert_eq!(line, 3);
            assert_eq!(error, LeagueError::DuplicatePlayerName);
        }
        other => panic!("expected a row error, got {other:?}"),
    }
    assert_eq!(league.players.len(), 1);
}

#[test]
fn import_rejects_malformed_levels() {
    let mut league = League::new("Club", 1).unwrap();
    let err = import_roster(&mut league, "name,level\nBob,strong\n".as_bytes()).unwrap_err();
    assert!(matches!(err, RosterError::Csv(_)));
    assert!(league.players.is_empty());

    let err = import_roster(&mut league, "name,level\nBob,0\n".as_bytes()).unwrap_err();
    assert!(matches!(
        err,
        RosterError::Row {
            error: LeagueError::InvalidLevel,
            ..
        }
    ));
}

#[test]
fn export_lists_players_in_ranked_order() {
    let mut league = League::new("Club", 1).unwrap();
    import_roster(&mut league, "name,level\nAnn,1\nBen,1\nCat,1\nDan,1\n".as_bytes()).unwrap();
    let ids: Vec<_> = league.players.iter().map(|p| p.id).collect();
    let mut m = doubles_league_web::GameMatch::new([ids[2], ids[3]], [ids[0], ids[1]]);
    m.set_score(6, 1);
    league.rounds.push(doubles_league_web::Round::new(1, vec![m]));

    let csv = leaderboard_csv(&league.leaderboard()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "position,name,level,P,SV,SG,W,L,miniSG,miniSV");
    assert_eq!(lines[1], "1,Cat,1,3,1,5,1,0,0,0");
    assert_eq!(lines[4], "4,Ben,1,0,-1,-5,0,1,0,0");
    assert_eq!(lines.len(), 5);
}
