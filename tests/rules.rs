mod common;

use cardmatch::{
    Card, Category, Color, Direction, DrawOutcome, Face, GameBuilder, GameError, GameStatus,
    InvalidPlay, PlayOutcome, card,
};
use common::{blue, green, green_draws, hand, red, table, yellow};

#[test]
fn fresh_deck_has_108_cards() {
    let deck = card::full_deck();
    assert_eq!(deck.len(), 108);
    let count = |category: Category| deck.iter().filter(|c| c.category() == category).count();
    assert_eq!(count(Category::Number), 76);
    assert_eq!(count(Category::Special), 24);
    assert_eq!(count(Category::Wild), 8);
}

#[test]
fn start_deals_seven_each_and_never_opens_on_wild_draw_four() -> Result<(), GameError> {
    for seed in 0..40 {
        let mut game = GameBuilder::new("DEAL").with_seed(seed).build()?;
        for id in ["a", "b", "c"] {
            game.add_player(id, id)?;
        }
        game.start_game()?;
        let view = game.state_projection();
        assert_eq!(view.status, GameStatus::Playing);
        assert_eq!(view.current_player_index, 0);
        assert!(view.players.iter().all(|p| p.hand_size == 7));
        assert_eq!(view.draw_pile_count, 108 - 21 - 1);
        assert_eq!(view.discard_pile_count, 1);
        let top = view.top_card.expect("opening card");
        assert_ne!(top.face(), Face::WildDrawFour);
        if top.face() == Face::Wild {
            assert!(view.declared_color.is_some());
        }
        assert_eq!(game.all_cards().len(), 108);
    }
    Ok(())
}

#[test]
fn wild_draw_four_opener_goes_under_the_draw_pile() -> Result<(), GameError> {
    let hands = vec![vec![red(1)], vec![blue(2)]];
    let game = table(
        &hands,
        Card::wild_draw_four(),
        &[red(5), green_draws()[0], green_draws()[1]],
    )?;
    assert_eq!(game.top_card(), Some(red(5)));
    assert_eq!(game.pending_draw(), 0);
    assert_eq!(game.state_projection().draw_pile_count, 3);
    assert!(game.all_cards().contains(&Card::wild_draw_four()));
    Ok(())
}

#[test]
fn wild_opener_picks_a_color() -> Result<(), GameError> {
    let hands = vec![vec![red(1), red(2)], vec![blue(2), blue(3)]];
    let game = table(&hands, Card::wild(), &green_draws())?;
    assert!(game.declared_color().is_some());
    assert!(!game.wild_draw_four_pending());
    Ok(())
}

#[test]
fn draw_two_opener_saddles_first_seat() -> Result<(), GameError> {
    let hands = vec![vec![red(3), blue(4)], vec![blue(5), blue(6)]];
    let mut game = table(&hands, Card::draw_two(Color::Red), &green_draws())?;
    assert_eq!(game.current_player(), Some("a"));
    assert_eq!(game.pending_draw(), 2);

    let before = game.state_projection();
    let err = game.play_card("a", 0, None).unwrap_err();
    assert_eq!(err, GameError::InvalidPlay(InvalidPlay::MustDrawOrStack));
    assert_eq!(game.state_projection(), before);

    let outcome = game.draw_card("a")?;
    assert_eq!(
        outcome,
        DrawOutcome::Forced {
            requested: 2,
            drawn: 2,
            has_playable: false
        }
    );
    assert_eq!(game.pending_draw(), 0);
    assert_eq!(hand(&game, "a").len(), 4);
    game.pass_turn("a")?;
    assert_eq!(game.current_player(), Some("b"));
    Ok(())
}

#[test]
fn skip_opener_skips_at_first_advance() -> Result<(), GameError> {
    let hands = vec![
        vec![red(1), red(2)],
        vec![blue(1), blue(2)],
        vec![yellow(1), yellow(2)],
    ];
    let mut game = table(&hands, Card::skip(Color::Red), &green_draws())?;
    assert_eq!(game.current_player(), Some("a"));
    game.say_card_match("a")?;
    game.play_card("a", 0, None)?;
    assert_eq!(game.current_player(), Some("c"));
    Ok(())
}

#[test]
fn reverse_opener_flips_direction() -> Result<(), GameError> {
    let hands = vec![
        vec![red(1), red(2)],
        vec![blue(1), blue(2)],
        vec![yellow(1), yellow(2)],
    ];
    let mut game = table(&hands, Card::reverse(Color::Red), &green_draws())?;
    assert_eq!(game.direction(), Direction::CounterClockwise);
    assert_eq!(game.current_player(), Some("a"));
    game.say_card_match("a")?;
    game.play_card("a", 0, None)?;
    assert_eq!(game.current_player(), Some("c"));
    Ok(())
}

#[test]
fn guards_reject_without_side_effects() -> Result<(), GameError> {
    let hands = vec![
        vec![red(1), blue(7), Card::wild()],
        vec![blue(1), blue(2), blue(3)],
    ];
    let mut game = table(&hands, red(3), &green_draws())?;
    let before = game.state_projection();
    let hand_before = hand(&game, "a");

    assert_eq!(game.play_card("b", 0, None), Err(GameError::NotYourTurn));
    assert_eq!(
        game.play_card("zed", 0, None),
        Err(GameError::PlayerNotFound(String::from("zed")))
    );
    assert_eq!(
        game.play_card("a", 9, None),
        Err(GameError::InvalidPlay(InvalidPlay::HandIndex(9)))
    );
    assert_eq!(
        game.play_card("a", 1, None),
        Err(GameError::InvalidPlay(InvalidPlay::CardMismatch {
            card: blue(7),
            top: red(3)
        }))
    );
    assert_eq!(
        game.play_card("a", 2, None),
        Err(GameError::InvalidPlay(InvalidPlay::MustDeclareColor))
    );
    assert_eq!(
        game.pass_turn("a"),
        Err(GameError::InvalidPlay(InvalidPlay::MustDrawBeforePassing))
    );

    assert_eq!(game.state_projection(), before);
    assert_eq!(hand(&game, "a"), hand_before);
    Ok(())
}

#[test]
fn commands_require_a_running_round() -> Result<(), GameError> {
    let mut game = GameBuilder::new("IDLE").with_max_players(2).build()?;
    game.add_player("a", "Alice")?;
    assert_eq!(
        game.start_game(),
        Err(GameError::NotEnoughPlayers { required: 2 })
    );
    assert_eq!(game.draw_card("a"), Err(GameError::GameNotInProgress));
    game.add_player("b", "Bob")?;
    assert_eq!(
        game.add_player("c", "Carol"),
        Err(GameError::RoomFull { capacity: 2 })
    );
    game.start_game()?;
    assert_eq!(game.start_game(), Err(GameError::GameAlreadyStarted));
    Ok(())
}

#[test]
fn join_rules() -> Result<(), GameError> {
    let mut game = GameBuilder::new("JOIN").build()?;
    game.add_player("a", "Alice")?;
    assert_eq!(
        game.add_player("a", "Again"),
        Err(GameError::DuplicatePlayer(String::from("a")))
    );
    game.add_player("b", "Bob")?;
    game.start_game()?;
    assert_eq!(
        game.add_player("c", "Carol"),
        Err(GameError::GameAlreadyStarted)
    );
    assert_eq!(game.score("a"), 0);
    Ok(())
}

#[test]
fn voluntary_draw_then_pass() -> Result<(), GameError> {
    let hands = vec![vec![blue(1), blue(2)], vec![yellow(4), yellow(5)]];
    let mut game = table(&hands, red(3), &[red(8), green(1)])?;
    let outcome = game.draw_card("a")?;
    assert_eq!(
        outcome,
        DrawOutcome::Voluntary {
            card: Some(red(8)),
            playable: true
        }
    );
    assert_eq!(
        game.draw_card("a"),
        Err(GameError::InvalidPlay(InvalidPlay::AlreadyDrawn))
    );
    assert_eq!(game.current_player(), Some("a"));
    assert!(game.state_projection().current_player_has_drawn);
    game.pass_turn("a")?;
    assert_eq!(game.current_player(), Some("b"));
    assert!(!game.player("a").expect("a").has_drawn());
    Ok(())
}

#[test]
fn drawn_card_may_be_played_immediately() -> Result<(), GameError> {
    let hands = vec![vec![blue(1), blue(2), blue(4)], vec![yellow(4), yellow(5), yellow(6)]];
    let mut game = table(&hands, red(3), &[red(8)])?;
    game.draw_card("a")?;
    let outcome = game.play_card("a", 3, None)?;
    assert_eq!(
        outcome,
        PlayOutcome::Continued {
            card: red(8),
            penalty_drawn: 0
        }
    );
    assert_eq!(game.top_card(), Some(red(8)));
    assert_eq!(game.current_player(), Some("b"));
    Ok(())
}

#[test]
fn exhausted_deck_still_lets_player_pass() -> Result<(), GameError> {
    let hands = vec![vec![blue(1), blue(2)], vec![yellow(4), yellow(5)]];
    let mut game = table(&hands, red(3), &[])?;
    let outcome = game.draw_card("a")?;
    assert!(outcome.exhausted());
    assert_eq!(hand(&game, "a").len(), 2);
    game.pass_turn("a")?;
    assert_eq!(game.current_player(), Some("b"));
    Ok(())
}

#[test]
fn wild_sets_declared_color_and_next_card_clears_it() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::wild(), red(1), red(2)],
        vec![blue(4), blue(5), blue(6)],
    ];
    let mut game = table(&hands, red(3), &green_draws())?;
    game.play_card("a", 0, Some(Color::Blue))?;
    assert_eq!(game.declared_color(), Some(Color::Blue));
    assert_eq!(game.current_player(), Some("b"));
    game.play_card("b", 0, None)?;
    assert_eq!(game.declared_color(), None);
    assert_eq!(game.top_card(), Some(blue(4)));
    Ok(())
}

#[test]
fn ordinary_skip_and_reverse() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::skip(Color::Red), red(1), red(2)],
        vec![blue(1), blue(2), Card::reverse(Color::Red)],
        vec![yellow(1), yellow(2), red(7)],
    ];
    let mut game = table(&hands, red(3), &green_draws())?;
    game.play_card("a", 0, None)?;
    assert_eq!(game.current_player(), Some("c"));
    game.play_card("c", 2, None)?;
    assert_eq!(game.current_player(), Some("a"));
    game.say_card_match("a")?;
    game.play_card("a", 0, None)?;
    assert_eq!(game.current_player(), Some("b"));
    game.play_card("b", 2, None)?;
    assert_eq!(game.direction(), Direction::CounterClockwise);
    assert_eq!(game.current_player(), Some("a"));
    Ok(())
}

#[test]
fn reverse_after_an_elimination_only_flips_direction() -> Result<(), GameError> {
    let hands = vec![
        vec![red(1), red(2)],
        vec![Card::reverse(Color::Red), blue(5)],
        vec![red(4), red(6)],
    ];
    let mut game = table(&hands, red(9), &green_draws())?;
    game.say_card_match("a")?;
    game.say_card_match("c")?;
    game.play_card("a", 0, None)?;
    game.draw_card("b")?;
    game.pass_turn("b")?;
    game.play_card("c", 0, None)?;
    game.play_card("a", 0, None)?;
    assert_eq!(game.turn_order(), ["b", "c"]);
    assert_eq!(game.current_player(), Some("b"));

    // Three seats remain in the room, so the reverse is not a skip.
    game.play_card("b", 0, None)?;
    assert_eq!(game.direction(), Direction::CounterClockwise);
    assert_eq!(game.current_player(), Some("c"));
    Ok(())
}

#[test]
fn reverse_with_two_players_acts_as_skip() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::reverse(Color::Red), red(1), red(2)],
        vec![blue(1), blue(2), blue(3)],
    ];
    let mut game = table(&hands, red(3), &green_draws())?;
    game.play_card("a", 0, None)?;
    assert_eq!(game.direction(), Direction::CounterClockwise);
    assert_eq!(game.current_player(), Some("a"));
    Ok(())
}
