// Scenario tests for the algorithm drivers through the public API

use algotrace::algorithms::{
    Activity, Arrangement, BacktrackingDriver, CoinUse, DpSolution, DynamicProgrammingDriver,
    GreedyDriver, GreedySolution, RecursionDriver, SearchKind, SortKind, SortingDriver, Tag,
};
use algotrace::config::EngineConfig;
use algotrace::engine::Driver;

fn instant() -> EngineConfig {
    EngineConfig::instant()
}

#[tokio::test]
async fn test_bubble_sort_terminates_sorted() {
    let mut driver = SortingDriver::with_config(&instant());
    driver.set_array(&[5, 3, 4, 1, 2]);
    driver.bubble_sort().await.unwrap();

    assert_eq!(driver.values(), vec![1, 2, 3, 4, 5]);
    assert!(driver.view().array.iter().all(|e| e.tag == Tag::Sorted));
    let state = driver.get_state();
    assert!(state.is_complete);
    assert_eq!(state.solution, Some(vec![1, 2, 3, 4, 5]));
}

#[tokio::test]
async fn test_seeded_random_arrays_sort() {
    let config = instant().with_seed(7);
    let mut driver = SortingDriver::with_config(&config);
    let generated = driver.generate_random_array(40, -50, 50).unwrap();
    driver.heap_sort().await.unwrap();

    let mut expected = generated;
    expected.sort_unstable();
    assert_eq!(driver.values(), expected);
    assert!(driver.get_state().log.count_kind(SortKind::Compare) > 0);
}

#[tokio::test]
async fn test_permutations_in_lexicographic_order() {
    let mut driver = BacktrackingDriver::with_config(&instant());
    let solutions = driver.permutations(&[1, 2, 3]).await.unwrap();

    let expected: Vec<Arrangement> = [
        [1, 2, 3],
        [1, 3, 2],
        [2, 1, 3],
        [2, 3, 1],
        [3, 1, 2],
        [3, 2, 1],
    ]
    .iter()
    .map(|p| Arrangement::Sequence(p.to_vec()))
    .collect();
    assert_eq!(solutions, expected);

    let state = driver.get_state();
    assert_eq!(state.log.count_kind(SearchKind::Solution), 6);
    let recorded: Vec<Arrangement> = state
        .log
        .iter()
        .filter(|s| s.kind == SearchKind::Solution)
        .map(|s| s.snapshot.arrangement.clone())
        .collect();
    assert_eq!(recorded, expected);

    assert_eq!(state.log.count_kind(SearchKind::Try), state.log.count_kind(SearchKind::Backtrack));
}

#[tokio::test]
async fn test_eight_queens() {
    let mut driver = BacktrackingDriver::with_config(&instant());
    assert_eq!(driver.n_queens(6).await.unwrap().len(), 4);
    assert_eq!(driver.n_queens(8).await.unwrap().len(), 92);
}

#[tokio::test]
async fn test_recursion_values() {
    let mut driver = RecursionDriver::with_config(&instant());
    assert_eq!(driver.factorial(10).await.unwrap(), 3_628_800);
    assert_eq!(driver.fibonacci(10).await.unwrap(), 55);

    let moves = driver.hanoi(3, 'A', 'C', 'B').await.unwrap();
    assert_eq!(moves.len(), 7);
    assert_eq!(moves[0].disk, 1);
    assert_eq!((moves[0].from, moves[0].to), ('A', 'C'));
    assert_eq!(moves[3].disk, 3);
}

#[tokio::test]
async fn test_dynamic_programming_answers() {
    let mut driver = DynamicProgrammingDriver::with_config(&instant());

    let nums = [10, 9, 2, 5, 3, 7, 101, 18];
    match driver.longest_increasing_subsequence(&nums).await.unwrap() {
        DpSolution::Subsequence { length, sequence } => {
            assert_eq!(length, 4);
            assert_eq!(sequence.len(), 4);
            assert!(sequence.windows(2).all(|w| w[0] < w[1]));
        }
        other => panic!("unexpected solution {:?}", other),
    }

    match driver.knapsack(&[1, 3, 4, 5], &[1, 4, 5, 7], 7).await.unwrap() {
        DpSolution::Knapsack { max_value, items } => {
            assert_eq!(max_value, 9);
            assert_eq!(items, vec![1, 2]);
        }
        other => panic!("unexpected solution {:?}", other),
    }

    match driver.edit_distance("kitten", "sitting").await.unwrap() {
        DpSolution::EditScript { distance, .. } => assert_eq!(distance, 3),
        other => panic!("unexpected solution {:?}", other),
    }
    assert!(driver.get_state().is_complete);
}

#[tokio::test]
async fn test_greedy_change_and_activities() {
    let mut driver = GreedyDriver::with_config(&instant());

    let change = driver.make_change(63, &[1, 5, 10, 25]).await.unwrap();
    assert_eq!(
        change,
        GreedySolution::Change {
            used: vec![
                CoinUse { coin: 25, count: 2 },
                CoinUse { coin: 10, count: 1 },
                CoinUse { coin: 1, count: 3 },
            ],
            remaining: 0,
        }
    );

    let activities = [(1, 4), (3, 5), (0, 6), (5, 7), (3, 9), (5, 9), (6, 10), (8, 11)]
        .iter()
        .enumerate()
        .map(|(i, &(start, end))| Activity {
            id: i as u32 + 1,
            start,
            end,
        })
        .collect::<Vec<_>>();
    match driver.select_activities(&activities).await.unwrap() {
        GreedySolution::Activities(chosen) => {
            let ids: Vec<u32> = chosen.iter().map(|a| a.id).collect();
            assert_eq!(ids, vec![1, 4, 8]);
        }
        other => panic!("unexpected solution {:?}", other),
    }
}
