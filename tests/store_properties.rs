//! Behavioral properties of stores, processors, and view binding, exercised
//! through the public API only.

use std::cell::RefCell;
use std::rc::Rc;

use bankflow::domain::{Account, User};
use bankflow::presenter::{AccountProcessor, AccountState, AuthProcessor, AuthState, AuthView};
use bankflow::store::ObservableStore;
use bankflow::view::connect;
use bankflow::RenderError;

fn alice() -> User {
    User {
        id: 1,
        username: "alice".into(),
        name: Some("Alice".into()),
    }
}

fn checking() -> Account {
    Account {
        id: 10,
        user_id: 1,
        balance: "100.00".into(),
        routing_number: "021000021".into(),
        account_number: "000123".into(),
        is_bank_linked: false,
        is_bank_verified: false,
    }
}

/// Records every snapshot a subscriber receives.
fn recorder<S: Clone + 'static>() -> (Rc<RefCell<Vec<S>>>, impl FnMut(&S) + 'static) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    (seen, move |s: &S| sink.borrow_mut().push(s.clone()))
}

#[test]
fn subscribe_replays_current_snapshot_once() {
    let account = AccountProcessor::launch();
    account.processor.set_user(alice());

    let (seen, cb) = recorder::<AccountState>();
    let _sub = account.store.subscribe(cb);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].user, Some(alice()));
}

#[test]
fn equal_writes_notify_nobody() {
    let account = AccountProcessor::launch();
    let (first, cb1) = recorder::<AccountState>();
    let (second, cb2) = recorder::<AccountState>();
    let _a = account.store.subscribe(cb1);
    let _b = account.store.subscribe(cb2);

    account.processor.set_loading(false);
    account.processor.set_loading(true);
    account.processor.set_loading(true);

    assert_eq!(first.borrow().len(), 2);
    assert_eq!(second.borrow().len(), 2);
    assert!(first.borrow()[1].is_loading);
}

#[test]
fn structurally_equal_rebuild_is_not_a_change() {
    let account = AccountProcessor::launch();
    account.processor.set_account(checking());

    let (seen, cb) = recorder::<AccountState>();
    let _sub = account.store.subscribe(cb);
    account.processor.set_account(checking());

    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn untouched_fields_survive_operations() {
    let auth = AuthProcessor::launch();
    auth.processor.set_view(AuthView::Register);
    auth.processor.set_2fa_required("temp-1", "SECRET");
    auth.processor.set_loading(true);

    let state = auth.store.get();
    assert_eq!(state.current_view, AuthView::TwoFaSetup);
    assert_eq!(state.temp_token.as_deref(), Some("temp-1"));
    assert_eq!(state.two_fa_secret.as_deref(), Some("SECRET"));
    assert!(state.is_loading);
}

#[test]
fn set_error_clears_loading() {
    let account = AccountProcessor::launch();
    account.processor.set_loading(true);
    account.processor.set_error("boom");

    let state = account.store.get();
    assert_eq!(state.error.as_deref(), Some("boom"));
    assert!(!state.is_loading);

    let auth = AuthProcessor::launch();
    auth.processor.set_loading(true);
    auth.processor.set_error("boom");
    assert!(!auth.store.get().is_loading);
}

#[test]
fn reset_always_equals_fresh_state() {
    let account = AccountProcessor::launch();
    account
        .processor
        .load_full_state(alice(), checking(), Vec::new());
    account.processor.set_error("late");

    account.processor.reset();
    assert_eq!(*account.store.get(), AccountState::default());
    account.processor.reset();
    assert_eq!(*account.store.get(), AccountState::default());

    let auth = AuthProcessor::launch();
    auth.processor.set_authenticated("token", Some(alice()));
    auth.processor.logout();
    assert_eq!(*auth.store.get(), AuthState::default());
}

#[test]
fn double_unsubscribe_keeps_other_subscribers() {
    let store = ObservableStore::new(0_u32);
    let (first, cb1) = recorder::<u32>();
    let (second, cb2) = recorder::<u32>();
    let a = store.subscribe(cb1);
    let _b = store.subscribe(cb2);

    assert!(a.unsubscribe());
    assert!(!a.unsubscribe());
    store.set(7);

    assert_eq!(*first.borrow(), vec![0]);
    assert_eq!(*second.borrow(), vec![0, 7]);
    assert_eq!(store.subscriber_count(), 1);
}

#[test]
fn dropping_a_handle_keeps_the_subscription() {
    let store = ObservableStore::new(0_u32);
    let (seen, cb) = recorder::<u32>();
    drop(store.subscribe(cb));

    store.set(1);
    assert_eq!(*seen.borrow(), vec![0, 1]);
}

#[test]
fn failing_views_do_not_starve_healthy_ones() {
    let account = AccountProcessor::launch();

    let erroring = |_: &AccountState| -> Result<(), RenderError> { Err(RenderError::Invalid("no layout".into())) };
    let panicking = |state: &AccountState| -> Result<(), RenderError> {
        if state.is_loading {
            panic!("renderer bug");
        }
        Ok(())
    };
    let (seen, mut cb) = recorder::<AccountState>();
    let healthy = move |state: &AccountState| -> Result<(), RenderError> {
        cb(state);
        Ok(())
    };

    let _e = connect(&account.store, erroring, "erroring");
    let _p = connect(&account.store, panicking, "panicking");
    let _h = connect(&account.store, healthy, "healthy");

    account.processor.set_loading(true);
    account.processor.set_error("offline");
    account.processor.set_loading(true);

    assert_eq!(seen.borrow().len(), 4);
    assert_eq!(account.store.subscriber_count(), 3);
}

#[test]
fn notifications_follow_registration_then_write_order() {
    let account = AccountProcessor::launch();
    let log = Rc::new(RefCell::new(Vec::new()));

    let a_log = Rc::clone(&log);
    let _a = account.store.subscribe(move |s: &AccountState| {
        a_log.borrow_mut().push(format!("A{}", step(s)));
    });
    let b_log = Rc::clone(&log);
    let _b = account.store.subscribe(move |s: &AccountState| {
        b_log.borrow_mut().push(format!("B{}", step(s)));
    });

    account.processor.set_user(alice());
    account.processor.set_account(checking());

    assert_eq!(*log.borrow(), vec!["A0", "B0", "A1", "B1", "A2", "B2"]);
}

fn step(state: &AccountState) -> u8 {
    match (&state.user, &state.account) {
        (None, None) => 0,
        (Some(_), None) => 1,
        _ => 2,
    }
}

#[test]
fn writes_from_a_subscriber_reach_everyone_in_order() {
    let store = ObservableStore::new(0_u32);
    let log = Rc::new(RefCell::new(Vec::new()));

    let writer = store.clone();
    let a_log = Rc::clone(&log);
    let _a = store.subscribe(move |v: &u32| {
        a_log.borrow_mut().push(("a", *v));
        if *v == 1 {
            writer.set(2);
        }
    });
    let b_log = Rc::clone(&log);
    let _b = store.subscribe(move |v: &u32| b_log.borrow_mut().push(("b", *v)));

    store.set(1);

    assert_eq!(
        *log.borrow(),
        vec![("a", 0), ("b", 0), ("a", 1), ("b", 1), ("a", 2), ("b", 2)]
    );
    assert_eq!(*store.get(), 2);
}

#[test]
fn write_from_first_delivery_is_seen_by_that_subscriber() {
    let account = AccountProcessor::launch();
    let processor = account.processor.clone();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);

    let _sub = account.store.subscribe(move |s: &AccountState| {
        log.borrow_mut().push(s.is_loading);
        if !s.is_loading {
            processor.set_loading(true);
        }
    });

    assert!(account.store.get().is_loading);
    assert_eq!(*seen.borrow(), vec![false, true]);
}
