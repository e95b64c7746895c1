//! Integration tests for the leaderboard: aggregation, primary order, and mini-league tie-breaks.

use doubles_league_web::{rank, GameMatch, LeaderboardRow, Player, PlayerId, Round};

/// Named players plus anonymous fillers that make up the other seats of each match.
/// Every filler plays exactly one match, so fillers never reach the named players' totals
/// in these scenarios.
struct Fixture {
    players: Vec<Player>,
    matches: Vec<GameMatch>,
}

impl Fixture {
    fn new(names: &[&str]) -> Self {
        Self {
            players: names.iter().map(|n| Player::new(*n, 1)).collect(),
            matches: Vec::new(),
        }
    }

    fn id(&self, name: &str) -> PlayerId {
        self.players.iter().find(|p| p.name == name).unwrap().id
    }

    fn filler(&mut self) -> PlayerId {
        let p = Player::new(format!("~filler{:02}", self.players.len()), 1);
        let id = p.id;
        self.players.push(p);
        id
    }

    /// `a` (team A) against `b` (team B), each with a filler partner.
    fn meet(&mut self, a: &str, b: &str, games_a: u32, games_b: u32) {
        let (a, b) = (self.id(a), self.id(b));
        let (fa, fb) = (self.filler(), self.filler());
        let mut m = GameMatch::new([a, fa], [b, fb]);
        m.set_score(games_a, games_b);
        self.matches.push(m);
    }

    /// `a` with a filler partner against two fillers.
    fn versus_fillers(&mut self, a: &str, games_a: u32, games_b: u32) {
        let a = self.id(a);
        let (fa, f1, f2) = (self.filler(), self.filler(), self.filler());
        let mut m = GameMatch::new([a, fa], [f1, f2]);
        m.set_score(games_a, games_b);
        self.matches.push(m);
    }

    fn rank(&self) -> Vec<LeaderboardRow> {
        rank(&self.players, &[Round::new(1, self.matches.clone())])
    }
}

fn names(rows: &[LeaderboardRow]) -> Vec<&str> {
    rows.iter().map(|r| r.name()).collect()
}

fn row<'a>(rows: &'a [LeaderboardRow], name: &str) -> &'a LeaderboardRow {
    rows.iter().find(|r| r.name() == name).unwrap()
}

#[test]
fn single_match_ranks_winners_above_losers() {
    let players: Vec<Player> = ["Ann", "Ben", "Cat", "Dan"].iter().map(|n| Player::new(*n, 2)).collect();
    let mut m = GameMatch::new([players[2].id, players[3].id], [players[0].id, players[1].id]);
    m.set_score(6, 2);
    let rows = rank(&players, &[Round::new(1, vec![m])]);

    assert_eq!(names(&rows), ["Cat", "Dan", "Ann", "Ben"]);
    for winner in &rows[..2] {
        assert_eq!((winner.points, winner.set_balance, winner.game_balance), (3, 1, 4));
        assert_eq!((winner.wins, winner.losses), (1, 0));
    }
    for loser in &rows[2..] {
        assert_eq!((loser.points, loser.set_balance, loser.game_balance), (0, -1, -4));
        assert_eq!((loser.wins, loser.losses), (0, 1));
    }
}

#[test]
fn unscored_matches_do_not_count() {
    let players: Vec<Player> = ["Ann", "Ben", "Cat", "Dan"].iter().map(|n| Player::new(*n, 1)).collect();
    let mut half = GameMatch::new([players[0].id, players[1].id], [players[2].id, players[3].id]);
    half.games_a = Some(6);
    let unplayed = GameMatch::new([players[0].id, players[2].id], [players[1].id, players[3].id]);
    let rows = rank(&players, &[Round::new(1, vec![half, unplayed])]);
    for r in &rows {
        assert_eq!((r.points, r.set_balance, r.game_balance, r.wins, r.losses), (0, 0, 0, 0, 0));
    }
    assert_eq!(names(&rows), ["Ann", "Ben", "Cat", "Dan"]);
}

#[test]
fn rank_is_repeatable() {
    let mut f = Fixture::new(&["Abe", "Bea", "Cid"]);
    f.meet("Abe", "Bea", 6, 4);
    f.meet("Bea", "Cid", 6, 1);
    f.versus_fillers("Cid", 6, 0);
    assert_eq!(f.rank(), f.rank());
}

#[test]
fn head_to_head_separates_two_tied_players() {
    let mut f = Fixture::new(&["Amy", "Zed"]);
    f.meet("Zed", "Amy", 6, 4);
    f.versus_fillers("Amy", 6, 4);
    f.versus_fillers("Zed", 4, 6);
    let rows = f.rank();

    let (zed, amy) = (row(&rows, "Zed"), row(&rows, "Amy"));
    assert_eq!((zed.points, zed.set_balance, zed.game_balance), (3, 0, 0));
    assert_eq!((amy.points, amy.set_balance, amy.game_balance), (3, 0, 0));

    let pos = |n: &str| rows.iter().position(|r| r.name() == n).unwrap();
    assert_eq!(pos("Zed") + 1, pos("Amy"));
    assert!(zed.mini.is_none());
    assert!(amy.mini.is_none());
}

#[test]
fn tie_without_meetings_falls_back_to_name() {
    let mut f = Fixture::new(&["Cid", "Abe", "Bo"]);
    for n in ["Cid", "Abe", "Bo"] {
        f.versus_fillers(n, 6, 3);
    }
    let rows = f.rank();

    // The winning fillers share the same totals and sort after the named players.
    assert_eq!(&names(&rows)[..3], ["Abe", "Bo", "Cid"]);
    for r in &rows[..3] {
        assert_eq!((r.points, r.set_balance, r.game_balance), (3, 1, 3));
        let mini = r.mini.as_ref().unwrap();
        assert_eq!(mini.game_balance, 0);
        assert!(mini.opponents.is_empty());
    }
}

#[test]
fn mini_league_orders_by_games_among_the_tied_players() {
    // Cara, Abe and Bea beat each other in a cycle, then even out against fillers:
    // each ends on 2 wins, 2 losses and a game balance of zero.
    let mut f = Fixture::new(&["Abe", "Bea", "Cara"]);
    f.meet("Cara", "Abe", 6, 2);
    f.meet("Abe", "Bea", 6, 4);
    f.meet("Bea", "Cara", 6, 5);
    f.versus_fillers("Cara", 6, 5);
    f.versus_fillers("Cara", 2, 6);
    f.versus_fillers("Abe", 6, 2);
    f.versus_fillers("Abe", 4, 6);
    f.versus_fillers("Bea", 6, 4);
    f.versus_fillers("Bea", 5, 6);
    let rows = f.rank();

    assert_eq!(&names(&rows)[..3], ["Cara", "Bea", "Abe"]);
    for r in &rows[..3] {
        assert_eq!((r.points, r.set_balance, r.game_balance), (6, 0, 0));
    }

    let cara = row(&rows, "Cara").mini.clone().unwrap();
    assert_eq!((cara.games_for, cara.games_against, cara.game_balance), (11, 8, 3));
    assert_eq!((cara.wins, cara.losses, cara.set_balance), (1, 1, 0));
    assert_eq!(cara.opponents.len(), 2);

    let bea = row(&rows, "Bea").mini.clone().unwrap();
    assert_eq!(bea.game_balance, -1);
    let abe = row(&rows, "Abe").mini.clone().unwrap();
    assert_eq!(abe.game_balance, -2);
}

#[test]
fn mini_league_uses_wins_when_game_balance_is_level() {
    // Zoe and Amy both finish +2 in games among the three, but Zoe won both her meetings.
    let mut f = Fixture::new(&["Amy", "Mia", "Zoe"]);
    f.meet("Zoe", "Amy", 6, 5);
    f.meet("Zoe", "Mia", 6, 5);
    f.meet("Amy", "Mia", 6, 3);
    f.versus_fillers("Zoe", 5, 6);
    f.versus_fillers("Zoe", 5, 6);
    f.versus_fillers("Amy", 6, 4);
    f.versus_fillers("Amy", 2, 6);
    f.versus_fillers("Mia", 6, 4);
    f.versus_fillers("Mia", 6, 4);
    let rows = f.rank();

    assert_eq!(&names(&rows)[..3], ["Zoe", "Amy", "Mia"]);
    let zoe = row(&rows, "Zoe").mini.clone().unwrap();
    let amy = row(&rows, "Amy").mini.clone().unwrap();
    let mia = row(&rows, "Mia").mini.clone().unwrap();
    assert_eq!((zoe.game_balance, zoe.set_balance), (2, 2));
    assert_eq!((amy.game_balance, amy.set_balance), (2, 0));
    assert_eq!((mia.game_balance, mia.set_balance), (-4, -2));
}

#[test]
fn players_missing_from_the_pool_are_not_listed() {
    let mut f = Fixture::new(&["Ann", "Gone"]);
    f.meet("Ann", "Gone", 6, 1);
    let gone = f.id("Gone");
    f.players.retain(|p| p.id != gone);
    let rows = f.rank();
    assert!(rows.iter().all(|r| r.id() != gone));
    assert_eq!(row(&rows, "Ann").game_balance, 5);
}

#[test]
fn level_score_counts_games_but_no_result() {
    let players: Vec<Player> = ["Ann", "Ben", "Cat", "Dan"].iter().map(|n| Player::new(*n, 1)).collect();
    let mut m = GameMatch::new([players[0].id, players[1].id], [players[2].id, players[3].id]);
    m.set_score(5, 5);
    assert!(m.winner.is_none());
    let rows = rank(&players, &[Round::new(1, vec![m])]);
    for r in &rows {
        assert_eq!((r.wins, r.losses, r.points, r.game_balance), (0, 0, 0, 0));
    }
}

#[test]
fn rows_serialize_with_short_keys_and_skip_empty_mini_fields() {
    let mut f = Fixture::new(&["Abe", "Bea", "Cara"]);
    f.meet("Cara", "Abe", 6, 2);
    f.meet("Abe", "Bea", 6, 4);
    f.meet("Bea", "Cara", 6, 5);
    f.versus_fillers("Cara", 6, 5);
    f.versus_fillers("Cara", 2, 6);
    f.versus_fillers("Abe", 6, 2);
    f.versus_fillers("Abe", 4, 6);
    f.versus_fillers("Bea", 6, 4);
    f.versus_fillers("Bea", 5, 6);
    let rows = f.rank();

    let cara = serde_json::to_value(row(&rows, "Cara")).unwrap();
    assert_eq!(cara["name"], "Cara");
    assert_eq!(cara["P"], 6);
    assert_eq!(cara["SV"], 0);
    assert_eq!(cara["SG"], 0);
    assert_eq!(cara["miniSG"], 3);
    assert_eq!(cara["GPmini"], 11);
    assert_eq!(cara["GCmini"], 8);
    assert_eq!(cara["oppMini"].as_array().unwrap().len(), 2);
    assert!(cara.get("miniSV").is_none());

    let lonely = serde_json::to_value(rows.last().unwrap()).unwrap();
    assert!(lonely.get("miniSG").is_none());
    assert!(lonely.get("oppMini").is_none());
}
