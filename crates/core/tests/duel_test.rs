use chrono::{Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use ppbot_core::games::duel::{AcceptError, ChallengeError, DUEL_TIMEOUT_SECONDS, DuelBook, DuelOutcome};
use rstest::rstest;

const ALICE: u64 = 1;
const BOB: u64 = 2;
const CAROL: u64 = 3;

#[test]
fn test_challenge_and_accept() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let mut book = DuelBook::new();

    book.challenge(ALICE, BOB, now).unwrap();
    assert!(book.is_involved(ALICE));
    assert!(book.is_involved(BOB));

    let accepted = book.accept(BOB, ALICE, now + Duration::seconds(10)).unwrap();
    assert_eq!(accepted.challenger, ALICE);
    assert!(!book.is_involved(ALICE));
    assert!(!book.is_involved(BOB));
}

#[test]
fn test_challenge_rejections() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let mut book = DuelBook::new();

    assert_eq!(book.challenge(ALICE, ALICE, now), Err(ChallengeError::SelfChallenge));

    book.challenge(ALICE, BOB, now).unwrap();
    assert_eq!(book.challenge(ALICE, BOB, now), Err(ChallengeError::AlreadyChallenged));
    assert_eq!(book.challenge(ALICE, CAROL, now), Err(ChallengeError::ChallengerBusy));
    assert_eq!(book.challenge(CAROL, BOB, now), Err(ChallengeError::TargetBusy));
    assert_eq!(book.challenge(CAROL, ALICE, now), Err(ChallengeError::TargetBusy));
}

#[test]
fn test_accept_errors() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let mut book = DuelBook::new();

    assert_eq!(book.accept(BOB, ALICE, now), Err(AcceptError::NoPendingDuel));

    book.challenge(ALICE, BOB, now).unwrap();
    assert_eq!(book.accept(BOB, CAROL, now), Err(AcceptError::WrongChallenger { actual: ALICE }));
    // The request survives a wrong accept.
    assert!(book.pending_for(BOB).is_some());
}

#[test]
fn test_requests_expire() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let later = now + Duration::seconds(DUEL_TIMEOUT_SECONDS + 1);
    let mut book = DuelBook::new();

    book.challenge(ALICE, BOB, now).unwrap();
    assert_eq!(book.accept(BOB, ALICE, later), Err(AcceptError::NoPendingDuel));

    // Both users are free again once the request lapsed.
    book.challenge(ALICE, BOB, now).unwrap();
    assert!(book.challenge(CAROL, BOB, later).is_ok());
}

#[rstest]
#[case(15, 3, DuelOutcome::ChallengerWins)]
#[case(3, 15, DuelOutcome::AcceptorWins)]
#[case(9, 9, DuelOutcome::Draw)]
fn test_duel_outcome(#[case] challenger: i32, #[case] acceptor: i32, #[case] expected: DuelOutcome) {
    assert_eq!(DuelOutcome::decide(challenger, acceptor), expected);
}

#[test]
fn test_expire_matches_issue_time() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let mut book = DuelBook::new();

    book.challenge(ALICE, BOB, now).unwrap();
    assert_eq!(book.expire(BOB, now - Duration::seconds(1)), None);
    assert_eq!(book.expire(BOB, now).map(|duel| duel.challenger), Some(ALICE));
    assert!(!book.is_involved(ALICE));
}
