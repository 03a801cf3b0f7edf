use super::*;

fn img(tag: u8) -> EncodedImage {
    EncodedImage::from_bytes("image/png", vec![tag])
}

fn started() -> SessionState {
    SessionState::new().apply(SessionEvent::GenerationStarted {
        styles: vec!["LinkedIn".to_string(), "Instagram".to_string()],
        variations: 2,
    })
}

fn settle(state: &SessionState, style: &str, variation: u32, outcome: Result<EncodedImage, String>) -> SessionState {
    let slot = SlotId::new(style, variation);
    let attempt = state.slot(&slot).unwrap().attempt;
    state.apply(SessionEvent::SlotSettled {
        slot,
        attempt,
        outcome,
    })
}

#[test]
fn generation_started_creates_pending_slots_in_declared_order() {
    let state = started();
    let order: Vec<_> = state.slots().map(|s| s.id.key()).collect();
    assert_eq!(order, vec!["LinkedIn_1", "LinkedIn_2", "Instagram_1", "Instagram_2"]);
    assert!(state.slots().all(|s| s.status.is_pending() && s.attempt == 1));
    assert!(state.is_generating());
    assert_eq!(
        state.progress(),
        Progress {
            total: 4,
            done: 0,
            failed: 0,
            pending: 4
        }
    );
    let names: Vec<_> = state.collection().style_names().collect();
    assert_eq!(names, vec!["LinkedIn", "Instagram"]);
}

#[test]
fn apply_does_not_mutate_previous_state() {
    let before = started();
    let after = settle(&before, "LinkedIn", 1, Ok(img(1)));
    assert!(before.slot(&SlotId::new("LinkedIn", 1)).unwrap().status.is_pending());
    assert!(after.slot(&SlotId::new("LinkedIn", 1)).unwrap().status.is_done());
}

#[test]
fn slot_settles_exactly_once() {
    let s = started();
    let s = settle(&s, "Instagram", 2, Err("quota".to_string()));
    let again = s.apply(SessionEvent::SlotSettled {
        slot: SlotId::new("Instagram", 2),
        attempt: 1,
        outcome: Ok(img(9)),
    });
    let slot = again.slot(&SlotId::new("Instagram", 2)).unwrap();
    assert_eq!(slot.status.error_message(), Some("quota"));
    assert!(slot.status.image().is_none());
}

#[test]
fn reset_only_touches_one_slot_and_drops_stale_results() {
    let s = started();
    let s = settle(&s, "LinkedIn", 1, Ok(img(1)));
    let s = settle(&s, "LinkedIn", 2, Err("boom".to_string()));

    let s = s.apply(SessionEvent::ResetRequested {
        slot: SlotId::new("LinkedIn", 2),
    });
    let reset = s.slot(&SlotId::new("LinkedIn", 2)).unwrap();
    assert!(reset.status.is_pending());
    assert_eq!(reset.attempt, 2);
    assert!(s.slot(&SlotId::new("LinkedIn", 1)).unwrap().status.is_done());

    // A late result from the first attempt is ignored.
    let stale = s.apply(SessionEvent::SlotSettled {
        slot: SlotId::new("LinkedIn", 2),
        attempt: 1,
        outcome: Ok(img(7)),
    });
    assert!(stale.slot(&SlotId::new("LinkedIn", 2)).unwrap().status.is_pending());

    let fresh = settle(&s, "LinkedIn", 2, Ok(img(8)));
    assert_eq!(
        fresh
            .slot(&SlotId::new("LinkedIn", 2))
            .unwrap()
            .status
            .image()
            .unwrap()
            .bytes(),
        &[8]
    );
}

#[test]
fn unknown_slots_are_ignored() {
    let s = started();
    let after = s
        .apply(SessionEvent::ResetRequested {
            slot: SlotId::new("TikTok", 1),
        })
        .apply(SessionEvent::SlotSettled {
            slot: SlotId::new("LinkedIn", 3),
            attempt: 1,
            outcome: Ok(img(1)),
        });
    assert_eq!(after, s);
}

#[test]
fn restarting_bumps_attempts() {
    let s = settle(&started(), "LinkedIn", 1, Ok(img(1)));
    let restarted = s.apply(SessionEvent::GenerationStarted {
        styles: vec!["LinkedIn".to_string(), "LinkedIn".to_string(), "X".to_string()],
        variations: 2,
    });
    assert_eq!(restarted.progress().total, 4);
    assert_eq!(restarted.slot(&SlotId::new("LinkedIn", 1)).unwrap().attempt, 2);
    assert_eq!(restarted.slot(&SlotId::new("X", 1)).unwrap().attempt, 1);
    assert!(restarted.slot(&SlotId::new("Instagram", 1)).is_none());
}

#[test]
fn album_input_requires_every_slot_done() {
    let s = started();
    let s = settle(&s, "LinkedIn", 1, Ok(img(1)));
    let s = settle(&s, "LinkedIn", 2, Err("nope".to_string()));

    match s.album_input().unwrap_err() {
        AlbumError::NotReady { pending, failed } => {
            assert_eq!(pending, vec!["Instagram_1", "Instagram_2"]);
            assert_eq!(failed, vec!["LinkedIn_2"]);
        }
        other => panic!("unexpected error: {other}"),
    }

    let s = s.apply(SessionEvent::ResetRequested {
        slot: SlotId::new("LinkedIn", 2),
    });
    let s = settle(&s, "LinkedIn", 2, Ok(img(2)));
    let s = settle(&s, "Instagram", 1, Ok(img(3)));
    let s = settle(&s, "Instagram", 2, Ok(img(4)));
    assert!(!s.is_generating());

    let input = s.album_input().unwrap();
    let keys: Vec<_> = input.keys().collect();
    assert_eq!(keys, vec!["Instagram_1", "Instagram_2", "LinkedIn_1", "LinkedIn_2"]);
}

#[test]
fn album_input_on_empty_session_is_an_error() {
    assert!(matches!(
        SessionState::new().album_input(),
        Err(AlbumError::Validation(_))
    ));
}
