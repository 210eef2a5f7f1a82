use chrono::{Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use ppbot_core::games::highlow::{Guess, HighLow};
use ppbot_core::games::mathrush::MathProblem;
use ppbot_core::games::scramble::Scramble;
use ppbot_core::games::trivia::{ApiQuestion, TriviaQuestion, choice_index, question_url};
use ppbot_core::games::{
    ActiveRound, GameBoard, GameKind, Puzzle, Submission, TriviaCooldowns, Verdict, format_cooldown, wyr,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rstest::rstest;

const CHANNEL: u64 = 10;
const GUILD: u64 = 1;

fn trivia_question() -> TriviaQuestion {
    TriviaQuestion {
        question: "What is the capital of France?".to_string(),
        correct_answer: "Paris".to_string(),
        choices: vec![
            "Berlin".to_string(),
            "Paris".to_string(),
            "Madrid".to_string(),
            "Rome".to_string(),
        ],
        category: "general_knowledge".to_string(),
        difficulty: "easy".to_string(),
    }
}

fn round(puzzle: Puzzle, message_id: u64) -> ActiveRound {
    ActiveRound::new(puzzle, GUILD, message_id, Utc::now())
}

#[rstest]
#[case("a", Some(0))]
#[case(" D ", Some(3))]
#[case("B", Some(1))]
#[case("e", None)]
#[case("ab", None)]
#[case("", None)]
fn test_choice_index(#[case] answer: &str, #[case] expected: Option<usize>) {
    assert_eq!(choice_index(answer), expected);
}

#[test]
fn test_trivia_judging() {
    let question = trivia_question();
    assert_eq!(question.judge("b"), Verdict::Correct);
    assert_eq!(question.judge("a"), Verdict::Wrong);
    assert_eq!(question.judge("paris"), Verdict::Ignore);
    assert_eq!(question.category_display(), "General Knowledge");
    assert_eq!(question.difficulty_emoji(), "🟢");
    assert!(question.choices_text().starts_with("**A.** Berlin\n**B.** Paris"));
}

#[test]
fn test_trivia_api_parsing_keeps_all_choices() {
    let json = r#"[{
        "category": "science",
        "correctAnswer": "Oxygen",
        "incorrectAnswers": ["Helium", "Neon", "Argon"],
        "question": {"text": "Which gas do humans need to breathe?"},
        "difficulty": "medium"
    }]"#;
    let parsed: Vec<ApiQuestion> = serde_json::from_str(json).unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    let question = TriviaQuestion::from_api(parsed.into_iter().next().unwrap(), "easy", &mut rng);

    assert_eq!(question.choices.len(), 4);
    assert!(question.choices.contains(&"Oxygen".to_string()));
    assert_eq!(question.difficulty, "medium");
    assert_eq!(question.category_display(), "Science");
}

#[test]
fn test_question_url() {
    assert_eq!(
        question_url("https://the-trivia-api.com/", "music", "hard"),
        "https://the-trivia-api.com/v2/questions?limit=1&categories=music&difficulties=hard"
    );
}

#[test]
fn test_scramble_differs_from_word() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..50 {
        let scramble = Scramble::new(&mut rng);
        assert_ne!(scramble.scrambled, scramble.word);

        let mut a: Vec<char> = scramble.scrambled.chars().collect();
        let mut b: Vec<char> = scramble.word.chars().collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }
}

#[test]
fn test_scramble_judging_ignores_wrong_words() {
    let mut rng = StdRng::seed_from_u64(1);
    let scramble = Scramble::from_word("Dragon", &mut rng);
    assert_eq!(scramble.judge(" DRAGON "), Verdict::Correct);
    assert_eq!(scramble.judge("wagon"), Verdict::Ignore);
    assert_eq!(scramble.difficulty_emoji(), "🟢");
}

#[rstest]
#[case(10, 20, "h", Verdict::Correct)]
#[case(10, 20, "lower", Verdict::Wrong)]
#[case(50, 50, "l", Verdict::Correct)]
#[case(50, 50, "higher", Verdict::Correct)]
#[case(80, 3, "L", Verdict::Correct)]
#[case(80, 3, "maybe", Verdict::Ignore)]
fn test_highlow(#[case] current: u32, #[case] next: u32, #[case] answer: &str, #[case] expected: Verdict) {
    let game = HighLow { current, next };
    assert_eq!(game.judge(answer), expected);
}

#[test]
fn test_guess_parsing() {
    assert_eq!(Guess::parse("H"), Some(Guess::Higher));
    assert_eq!(Guess::parse("lower"), Some(Guess::Lower));
    assert_eq!(Guess::parse("up"), None);
}

#[test]
fn test_math_problems() {
    let problem = MathProblem::from_parts(7, '×', 8);
    assert_eq!(problem.text, "7 × 8");
    assert_eq!(problem.judge("56"), Verdict::Correct);
    assert_eq!(problem.judge("55"), Verdict::Ignore);
    assert_eq!(problem.judge("fifty six"), Verdict::Ignore);

    assert_eq!(MathProblem::from_parts(5, '-', 30).answer, -25);

    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..100 {
        let problem = MathProblem::new(&mut rng);
        assert_eq!(problem.judge(&problem.answer.to_string()), Verdict::Correct);
    }
}

#[test]
fn test_board_allows_one_round_per_kind_per_channel() {
    let mut board = GameBoard::new();
    let mut rng = StdRng::seed_from_u64(2);

    assert!(board.open(CHANNEL, round(Puzzle::Trivia(trivia_question()), 100)).is_ok());
    assert_eq!(board.open(CHANNEL, round(Puzzle::Trivia(trivia_question()), 101)), Err(100));

    // Other kinds and other channels are independent.
    assert!(board.open(CHANNEL, round(Puzzle::Scramble(Scramble::new(&mut rng)), 102)).is_ok());
    assert!(board.open(CHANNEL + 1, round(Puzzle::Trivia(trivia_question()), 103)).is_ok());
    assert_eq!(board.active_message(CHANNEL, GameKind::Trivia), Some(100));
}

#[test]
fn test_board_single_attempt_per_user() {
    let mut board = GameBoard::new();
    board
        .open(CHANNEL, round(Puzzle::Trivia(trivia_question()), 100))
        .unwrap();

    assert_eq!(
        board.submit(CHANNEL, 7, "a"),
        Some(Submission::Missed { kind: GameKind::Trivia, solution_hint: None })
    );
    // Second attempt from the same user is ignored even if right.
    assert_eq!(board.submit(CHANNEL, 7, "b"), None);

    match board.submit(CHANNEL, 8, "b") {
        Some(Submission::Won(round)) => assert_eq!(round.message_id, 100),
        other => panic!("expected a win, got {other:?}"),
    }
    assert_eq!(board.active_message(CHANNEL, GameKind::Trivia), None);
}

#[test]
fn test_board_highlow_miss_reveals_number() {
    let mut board = GameBoard::new();
    board
        .open(CHANNEL, round(Puzzle::HighLow(HighLow { current: 10, next: 40 }), 5))
        .unwrap();

    assert_eq!(
        board.submit(CHANNEL, 1, "l"),
        Some(Submission::Missed { kind: GameKind::HighLow, solution_hint: Some("40".to_string()) })
    );
    assert!(matches!(board.submit(CHANNEL, 2, "h"), Some(Submission::Won(_))));
}

#[test]
fn test_board_expire_only_matching_round() {
    let mut board = GameBoard::new();
    board
        .open(CHANNEL, round(Puzzle::MathRush(MathProblem::from_parts(2, '+', 2)), 1))
        .unwrap();

    assert_eq!(board.expire(CHANNEL, GameKind::MathRush, 999), None);
    let expired = board.expire(CHANNEL, GameKind::MathRush, 1).unwrap();
    assert_eq!(expired.puzzle.solution(), "2 + 2 = 4");
    assert_eq!(board.expire(CHANNEL, GameKind::MathRush, 1), None);
}

#[test]
fn test_trivia_cooldowns() {
    let mut cooldowns = TriviaCooldowns::default();
    let won_at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();

    assert_eq!(cooldowns.remaining(GUILD, won_at), None);
    cooldowns.record_win(GUILD, won_at);
    assert_eq!(cooldowns.remaining(GUILD, won_at + Duration::seconds(45)), Some(Duration::seconds(15)));
    assert_eq!(cooldowns.remaining(GUILD, won_at + Duration::seconds(60)), None);

    cooldowns.record_win(GUILD, won_at);
    cooldowns.clear(GUILD);
    assert_eq!(cooldowns.remaining(GUILD, won_at), None);
}

#[rstest]
#[case(1, "1 second")]
#[case(59, "59 seconds")]
#[case(61, "1 minute and 1 second")]
#[case(125, "2 minutes and 5 seconds")]
fn test_format_cooldown(#[case] seconds: i64, #[case] expected: &str) {
    assert_eq!(format_cooldown(Duration::seconds(seconds)), expected);
}

#[test]
fn test_wyr_title_case() {
    assert_eq!(wyr::title_case("explore the ocean depths"), "Explore The Ocean Depths");
    let mut rng = StdRng::seed_from_u64(9);
    let (a, b) = wyr::pick(&mut rng);
    assert!(!a.is_empty() && !b.is_empty());
}
