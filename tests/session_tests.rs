use battleship_server::{
    Coordinate, Delivery, GridOwner, Lobby, MatchStatus, Message, Seat,
};

fn paired_lobby() -> Lobby {
    let mut lobby = Lobby::with_seed(1);
    assert!(lobby.connect(1).is_empty());
    assert_eq!(lobby.connect(2).len(), 4);
    lobby
}

fn for_conn(deliveries: &[Delivery], conn: u64) -> Vec<Message> {
    deliveries
        .iter()
        .filter(|(to, _)| *to == conn)
        .map(|(_, msg)| msg.clone())
        .collect()
}

fn fleet(lobby: &Lobby, conn: u64, seat: Seat) -> Vec<Coordinate> {
    let game = lobby.match_of(conn).unwrap();
    game.board(seat).occupied().cells().collect()
}

fn water(lobby: &Lobby, conn: u64, seat: Seat) -> Vec<Coordinate> {
    let game = lobby.match_of(conn).unwrap();
    (0..100)
        .map(Coordinate::from_index)
        .filter(|c| game.board(seat).ship_at(*c).is_none())
        .collect()
}

#[test]
fn test_pairing_announces_match() {
    let mut lobby = Lobby::with_seed(3);
    assert!(lobby.connect(1).is_empty());
    assert_eq!(lobby.waiting().collect::<Vec<_>>(), vec![1]);

    let out = lobby.connect(2);
    assert_eq!(lobby.waiting().count(), 0);
    assert_eq!(lobby.match_count(), 1);

    let names = match (&out[0], &out[1]) {
        (
            (1, Message::Join { game_id: 1, self_name: a, opponent_name: b }),
            (2, Message::Join { game_id: 1, self_name: c, opponent_name: d }),
        ) => {
            assert_eq!(a, d);
            assert_eq!(b, c);
            (a.clone(), b.clone())
        }
        other => panic!("unexpected join messages: {:?}", other),
    };
    assert_ne!(names.0, names.1);

    match &out[2] {
        (1, Message::Update(state)) => {
            assert_eq!(state.grid, GridOwner::Own);
            assert!(state.turn);
            assert_eq!(state.view.ships.len(), 5);
        }
        other => panic!("unexpected update: {:?}", other),
    }
    match &out[3] {
        (2, Message::Update(state)) => {
            assert_eq!(state.grid, GridOwner::Own);
            assert!(!state.turn);
            assert_eq!(state.current_player, Seat::First);
        }
        other => panic!("unexpected update: {:?}", other),
    }

    let session = lobby.session(1).unwrap();
    assert_eq!(session.game(), Some((1, Seat::First)));
    assert_eq!(session.name(), Some(names.0.as_str()));
    assert_eq!(lobby.session(2).unwrap().game(), Some((1, Seat::Second)));
}

#[test]
fn test_waiting_room_is_fifo() {
    let mut lobby = Lobby::with_seed(5);
    lobby.connect(1);
    lobby.connect(2);
    lobby.connect(3);
    assert_eq!(lobby.waiting().collect::<Vec<_>>(), vec![3]);

    let out = lobby.connect(4);
    assert!(matches!(out[0], (3, Message::Join { game_id: 2, .. })));
    assert!(matches!(out[1], (4, Message::Join { game_id: 2, .. })));
    assert_eq!(lobby.session(3).unwrap().game(), Some((2, Seat::First)));
    assert_eq!(lobby.match_count(), 2);
}

#[test]
fn test_accepted_shot_updates_both_players() {
    let mut lobby = paired_lobby();
    let out = lobby.handle(1, Message::Shot { x: 0, y: 0 });
    assert_eq!(out.len(), 2);

    match &out[0] {
        (1, Message::Update(state)) => {
            assert_eq!(state.grid, GridOwner::Opponent);
            assert!(!state.turn);
            assert_ne!(state.view.shots[0], 0);
        }
        other => panic!("unexpected delivery: {:?}", other),
    }
    match &out[1] {
        (2, Message::Update(state)) => {
            assert_eq!(state.grid, GridOwner::Own);
            assert!(state.turn);
            assert_eq!(state.current_player, Seat::Second);
        }
        other => panic!("unexpected delivery: {:?}", other),
    }
}

#[test]
fn test_out_of_turn_and_repeat_shots_are_silent() {
    let mut lobby = paired_lobby();
    assert!(lobby.handle(2, Message::Shot { x: 0, y: 0 }).is_empty());

    assert_eq!(lobby.handle(1, Message::Shot { x: 3, y: 3 }).len(), 2);
    assert!(lobby.handle(1, Message::Shot { x: 4, y: 4 }).is_empty());

    assert_eq!(lobby.handle(2, Message::Shot { x: 3, y: 3 }).len(), 2);
    // same cell on the same board again
    assert!(lobby.handle(1, Message::Shot { x: 3, y: 3 }).is_empty());
    assert!(lobby.handle(1, Message::Shot { x: 10, y: 0 }).is_empty());
    assert_eq!(
        lobby.match_of(1).unwrap().current_player(),
        Seat::First
    );
}

#[test]
fn test_shot_outside_a_match_is_ignored() {
    let mut lobby = Lobby::with_seed(9);
    lobby.connect(1);
    assert!(lobby.handle(1, Message::Shot { x: 0, y: 0 }).is_empty());
    assert!(lobby.handle(42, Message::Shot { x: 0, y: 0 }).is_empty());
    assert!(lobby.handle(1, Message::Hello { version: 1 }).is_empty());
}

#[test]
fn test_full_game_through_the_lobby() {
    let mut lobby = paired_lobby();
    let targets = fleet(&lobby, 1, Seat::Second);
    let mut misses = water(&lobby, 1, Seat::First).into_iter();
    let last = targets.len() - 1;

    let mut final_out = Vec::new();
    for (i, target) in targets.into_iter().enumerate() {
        let out = lobby.shoot(1, target);
        assert_eq!(out.len(), if i == last { 4 } else { 2 });
        if i == last {
            final_out = out;
            break;
        }
        let reply = lobby.shoot(2, misses.next().unwrap());
        assert_eq!(reply.len(), 2);
    }

    assert_eq!(final_out[0], (1, Message::GameOver { won: true }));
    assert_eq!(final_out[1], (2, Message::GameOver { won: false }));
    match &final_out[3] {
        (2, Message::Update(state)) => {
            assert_eq!(state.status, MatchStatus::GameOver);
            assert!(!state.turn);
        }
        other => panic!("unexpected delivery: {:?}", other),
    }

    // terminal gate: nobody may fire any more
    assert!(lobby.handle(1, Message::Shot { x: 9, y: 9 }).is_empty());
    assert!(lobby.handle(2, Message::Shot { x: 9, y: 9 }).is_empty());
}

#[test]
fn test_chat_is_escaped_and_echoed() {
    let mut lobby = paired_lobby();
    let name = lobby.session(1).unwrap().name().unwrap().to_string();

    let out = lobby.handle(1, Message::Chat("<b>ahoy</b> & 'yarr'".to_string()));
    let expected = "&lt;b&gt;ahoy&lt;&#x2F;b&gt; &amp; &#x27;yarr&#x27;".to_string();
    assert_eq!(
        out,
        vec![
            (
                2,
                Message::ChatMessage {
                    name: name.clone(),
                    message: expected.clone()
                }
            ),
            (
                1,
                Message::ChatMessage {
                    name: format!("{} (You)", name),
                    message: expected
                }
            ),
        ]
    );

    assert!(lobby.handle(1, Message::Chat(String::new())).is_empty());
}

#[test]
fn test_chat_requires_a_match() {
    let mut lobby = Lobby::with_seed(2);
    lobby.connect(1);
    assert!(lobby.handle(1, Message::Chat("anyone?".to_string())).is_empty());
}

#[test]
fn test_leave_forfeits_and_requeues() {
    let mut lobby = paired_lobby();
    let out = lobby.handle(1, Message::Leave);
    assert_eq!(
        out,
        vec![
            (
                2,
                Message::Notification {
                    message: "Opponent has left the game".to_string()
                }
            ),
            (2, Message::GameOver { won: true }),
            (1, Message::GameOver { won: false }),
            (1, Message::Left),
        ]
    );
    assert_eq!(lobby.waiting().collect::<Vec<_>>(), vec![1]);
    assert_eq!(lobby.session(1).unwrap().game(), None);
    assert_eq!(lobby.session(1).unwrap().name(), None);

    // the finished match stays until its last player leaves
    assert_eq!(lobby.match_count(), 1);
    assert!(lobby.handle(2, Message::Shot { x: 0, y: 0 }).is_empty());

    let out = lobby.handle(2, Message::Leave);
    assert_eq!(out[0], (2, Message::Left));
    assert!(matches!(out[1], (1, Message::Join { game_id: 2, .. })));
    assert!(matches!(out[2], (2, Message::Join { game_id: 2, .. })));
    assert_eq!(lobby.match_count(), 1);
    assert!(lobby.get_match(1).is_none());
    assert!(lobby.get_match(2).is_some());
}

#[test]
fn test_chat_stays_in_the_senders_match() {
    let mut lobby = paired_lobby();
    lobby.handle(1, Message::Leave);
    let out = lobby.connect(3);
    assert!(matches!(out[0], (1, Message::Join { game_id: 2, .. })));
    assert_eq!(lobby.session(2).unwrap().game(), Some((1, Seat::Second)));

    let out = lobby.handle(2, Message::Chat("secret".to_string()));
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].0, 2);
    assert!(for_conn(&out, 1).is_empty());

    let out = lobby.handle(1, Message::Chat("ahoy".to_string()));
    assert_eq!(for_conn(&out, 3).len(), 1);
    assert_eq!(for_conn(&out, 1).len(), 1);
    assert!(for_conn(&out, 2).is_empty());
}

#[test]
fn test_leave_outside_a_match_does_nothing() {
    let mut lobby = Lobby::with_seed(4);
    lobby.connect(1);
    assert!(lobby.handle(1, Message::Leave).is_empty());
    assert_eq!(lobby.waiting().collect::<Vec<_>>(), vec![1]);
}

#[test]
fn test_disconnect_forfeits_match() {
    let mut lobby = paired_lobby();
    let out = lobby.disconnect(2);
    assert_eq!(
        for_conn(&out, 1),
        vec![
            Message::Notification {
                message: "Opponent has left the game".to_string()
            },
            Message::GameOver { won: true },
        ]
    );
    assert!(lobby.session(2).is_none());
    assert_eq!(lobby.match_of(1).unwrap().winner(), Some(Seat::First));

    // remaining player leaves the finished match and waits alone
    let out = lobby.handle(1, Message::Leave);
    assert_eq!(out, vec![(1, Message::Left)]);
    assert_eq!(lobby.match_count(), 0);
    assert_eq!(lobby.waiting().collect::<Vec<_>>(), vec![1]);
}

#[test]
fn test_disconnect_while_waiting() {
    let mut lobby = Lobby::with_seed(6);
    lobby.connect(1);
    assert!(lobby.disconnect(1).is_empty());
    assert_eq!(lobby.waiting().count(), 0);

    // the next arrival waits instead of pairing with a ghost
    assert!(lobby.connect(2).is_empty());
    assert_eq!(lobby.match_count(), 0);
}

#[test]
fn test_duplicate_connect_is_ignored() {
    let mut lobby = Lobby::with_seed(8);
    lobby.connect(1);
    assert!(lobby.connect(1).is_empty());
    assert_eq!(lobby.waiting().collect::<Vec<_>>(), vec![1]);
}
