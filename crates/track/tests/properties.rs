use lr_track::*;
use proptest::prelude::*;

fn arb_intent() -> impl Strategy<Value = MoveIntent> {
    prop_oneof![Just(MoveIntent::Left), Just(MoveIntent::Right)]
}

fn arb_lane() -> impl Strategy<Value = Lane> {
    prop_oneof![Just(Lane::Left), Just(Lane::Middle), Just(Lane::Right)]
}

#[derive(Debug, Clone)]
enum PoolOp {
    Acquire,
    Release(usize),
}

fn arb_pool_op() -> impl Strategy<Value = PoolOp> {
    prop_oneof![
        2 => Just(PoolOp::Acquire),
        1 => (0usize..16).prop_map(PoolOp::Release),
    ]
}

proptest! {
    #[test]
    fn lane_sequences_stay_on_track(
        start in arb_lane(),
        intents in proptest::collection::vec(arb_intent(), 0..64),
    ) {
        let mut lane = start;
        for intent in intents {
            let t = lane.apply(intent);
            prop_assert!(Lane::ALL.contains(&t.lane));
            prop_assert!(lane.reaches(t.lane));
            prop_assert_eq!(t.changed, t.lane != lane);
            if !lane.can_move(intent) {
                prop_assert_eq!(t.lane, lane);
            }
            lane = t.lane;
        }
    }

    #[test]
    fn pool_bounded_and_release_idempotent(
        initial in 0usize..6,
        max in 1usize..8,
        ops in proptest::collection::vec(arb_pool_op(), 0..64),
    ) {
        let mut pool = SegmentPool::new(SegmentKind::Platform, initial, max);
        let mut held: Vec<SegmentHandle> = Vec::new();
        for op in ops {
            match op {
                PoolOp::Acquire => {
                    let acquired = pool.acquire().unwrap();
                    if let Some(evicted) = acquired.evicted {
                        prop_assert_eq!(held.len(), max);
                        held.retain(|h| *h != evicted);
                    }
                    held.push(acquired.handle);
                }
                PoolOp::Release(i) if !held.is_empty() => {
                    let h = held.remove(i % held.len());
                    prop_assert!(pool.release(h));
                    prop_assert!(!pool.release(h));
                    prop_assert!(pool.get(h).is_none());
                }
                PoolOp::Release(_) => {}
            }
            prop_assert!(pool.len() <= max);
            prop_assert_eq!(pool.active_count(), held.len());
            for h in &held {
                prop_assert!(pool.get(*h).is_some());
            }
        }
    }

    #[test]
    fn spawned_platforms_move_forward_by_a_gap(
        answers in proptest::collection::vec(arb_lane(), 1..40),
        lanes in proptest::collection::vec(arb_lane(), 1..40),
    ) {
        let params = TrackParams { pool_max: 64, ..TrackParams::default() };
        let mut track = Track::new(params, Box::new(ScriptedLaneChooser::new(answers)));
        track.start_run().unwrap();
        for lane in lanes {
            track.set_lane(lane);
            let before = track.generator_state().last_forward;
            let spawned = track.spawn_next().unwrap();
            let gap = spawned.placement.forward - before;
            prop_assert!(gap == params.full_gap || gap == params.half_gap);
            prop_assert!(lane.reaches(spawned.lane));
            prop_assert_eq!(gap == params.full_gap, spawned.lane == lane);
            prop_assert_eq!(spawned.placement.lateral, spawned.lane.offset(params.lane_distance));
        }
        let forwards: Vec<f32> = track.live_segments().map(|(_, s)| s.forward()).collect();
        prop_assert!(forwards.windows(2).all(|w| w[0] < w[1]));
    }
}
