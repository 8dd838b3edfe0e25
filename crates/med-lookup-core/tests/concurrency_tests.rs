//! Concurrent access to a shared lookup service.

use std::sync::{Arc, Mutex};
use std::thread;

use med_lookup_core::{LookupService, SelectionChange, SelectionState};

/// Every published state must be one of the complete outcomes, never a mix.
fn is_consistent(state: &SelectionState) -> bool {
    match &state.current_medicine {
        Some(current) => state
            .similar_medicines
            .iter()
            .all(|m| current.is_similar_to(m)),
        None => state.similar_medicines.is_empty(),
    }
}

#[test]
fn test_parallel_searches_never_interleave() {
    let service = Arc::new(LookupService::default());
    let published = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&published);
    service.subscribe(Arc::new(move |change: SelectionChange, state: &SelectionState| {
        sink.lock().unwrap().push((change, state.clone()));
    }));

    let queries = ["Aspirin", "Ibuprofen", "Nonexistent", "Calpol", "Medicine42B"];
    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                for round in 0..25 {
                    service.search_by_name(queries[(worker + round) % queries.len()]);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let published = published.lock().unwrap();
    assert_eq!(published.len(), 8 * 25 * 2);

    // Start and finish notifications alternate: calls never overlap
    for pair in published.chunks(2) {
        assert_eq!(pair[0].0, SelectionChange::SearchStarted);
        assert_eq!(pair[1].0, SelectionChange::SearchFinished);
        assert!(pair[0].1.loading);
        assert!(!pair[1].1.loading);
    }

    assert!(published.iter().all(|(_, state)| is_consistent(state)));

    // Final state is the last completed call's result
    let last = &published.last().unwrap().1;
    assert_eq!(&service.state(), last);
}

#[test]
fn test_parallel_selects_leave_consistent_state() {
    let service = Arc::new(LookupService::default());
    let picks: Vec<_> = ["Motrin", "Panadol", "Anaprox", "Medicine99D"]
        .iter()
        .map(|name| service.find_by_name(name).unwrap().clone())
        .collect();
    let picks = Arc::new(picks);

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let service = Arc::clone(&service);
            let picks = Arc::clone(&picks);
            thread::spawn(move || {
                for round in 0..50 {
                    service.select_medicine(&picks[(worker + round) % picks.len()]);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let state = service.state();
    assert!(is_consistent(&state));
    assert_eq!(state.similar_medicines.len(), 3);
    assert!(!state.loading);
    assert!(state.error_message.is_empty());
}
