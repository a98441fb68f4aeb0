// Scenario tests for the structural drivers

use algotrace::config::EngineConfig;
use algotrace::engine::Driver;
use algotrace::structures::{
    ArrayDriver, BinaryTreeDriver, GraphDriver, HashTableDriver, LinkedListDriver, Op, QueueDriver,
    StackDriver,
};

#[tokio::test]
async fn test_stack_capacity_boundaries() {
    let mut stack = StackDriver::new(&[], 2);
    stack.set_delay(std::time::Duration::ZERO);

    assert!(stack.push(1).await.unwrap());
    assert!(stack.push(2).await.unwrap());
    assert!(!stack.push(3).await.unwrap());

    assert_eq!(stack.pop().await.unwrap(), Some(2));
    assert_eq!(stack.pop().await.unwrap(), Some(1));
    assert_eq!(stack.pop().await.unwrap(), None);

    // Rejected operations leave no trace in the log
    let state = stack.get_state();
    assert_eq!(state.log.count_kind(Op::Push), 2);
    assert_eq!(state.log.count_kind(Op::Pop), 2);
}

#[tokio::test]
async fn test_hash_table_resizes_past_threshold() {
    let mut table = HashTableDriver::with_config(&EngineConfig::instant());
    assert_eq!(table.capacity(), 8);

    let keys = ["alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf"];
    for (i, key) in keys.iter().enumerate() {
        table.set(key, &i.to_string()).await.unwrap();
    }

    assert!(table.capacity() >= 16);
    assert_eq!(table.size(), 7);
    assert!(table.load_factor() <= 0.75);
    for (i, key) in keys.iter().enumerate() {
        assert_eq!(table.get(key).await.unwrap(), Some(i.to_string()));
    }
    assert!(table.get_state().log.count_kind(Op::Resize) >= 2);
}

#[tokio::test]
async fn test_queue_is_fifo_across_wraparound() {
    let mut queue = QueueDriver::new(3);
    queue.set_delay(std::time::Duration::ZERO);

    for value in [1, 2, 3] {
        assert!(queue.enqueue(value).await.unwrap());
    }
    assert!(!queue.enqueue(4).await.unwrap());
    assert_eq!(queue.dequeue().await.unwrap(), Some(1));
    assert!(queue.enqueue(4).await.unwrap());

    let mut drained = Vec::new();
    while let Some(value) = queue.dequeue().await.unwrap() {
        drained.push(value);
    }
    assert_eq!(drained, vec![2, 3, 4]);
    assert_eq!(queue.front(), None);
}

#[tokio::test]
async fn test_linked_list_operations() {
    let mut list = LinkedListDriver::with_config(&[2, 3], &EngineConfig::instant());
    list.prepend(1).await.unwrap();
    list.append(5).await.unwrap();
    list.insert(4, 3).await.unwrap();
    assert_eq!(list.values(), vec![1, 2, 3, 4, 5]);

    assert_eq!(list.search(4).await.unwrap(), Some(3));
    assert_eq!(list.delete(0).await.unwrap(), Some(1));
    assert_eq!(list.delete(10).await.unwrap(), None);
    assert_eq!(list.values(), vec![2, 3, 4, 5]);
}

#[tokio::test]
async fn test_bst_delete_uses_successor() {
    let mut tree = BinaryTreeDriver::with_config(&[8, 3, 10, 1, 6, 14, 4, 7], &EngineConfig::instant());
    assert!(tree.delete(3).await.unwrap());

    // 4 is the smallest value in 3's right subtree
    assert_eq!(
        tree.tree_array(),
        vec![Some(8), Some(4), Some(10), Some(1), Some(6), None, Some(14), None, None, None, Some(7)]
    );
    assert!(tree.search(7).await.unwrap());
    assert!(!tree.search(3).await.unwrap());
    assert_eq!(tree.size(), 7);
}

#[tokio::test]
async fn test_graph_traversals_follow_insertion_order() {
    let mut graph = GraphDriver::with_config(&EngineConfig::instant());
    for id in ["a", "b", "c", "d", "e"] {
        assert!(graph.add_node(id, id).await.unwrap());
    }
    for (x, y) in [("a", "c"), ("a", "b"), ("b", "d"), ("c", "d"), ("d", "e")] {
        assert!(graph.add_edge(x, y, None).await.unwrap());
    }
    assert!(!graph.add_node("a", "again").await.unwrap());
    assert!(!graph.add_edge("a", "z", None).await.unwrap());

    let dfs = graph.dfs("a").await.unwrap();
    assert_eq!(dfs, Some(vec!["a", "c", "d", "b", "e"].into_iter().map(String::from).collect()));

    let bfs = graph.bfs("a").await.unwrap();
    assert_eq!(bfs, Some(vec!["a", "c", "b", "d", "e"].into_iter().map(String::from).collect()));

    let state = graph.get_state();
    let last_visit = state
        .log
        .iter()
        .rev()
        .find(|s| s.kind == Op::Visit)
        .map(|s| s.snapshot.visited.len());
    assert_eq!(last_visit, Some(5));
    assert_eq!(graph.dfs("missing").await.unwrap(), None);
}

#[tokio::test]
async fn test_removals_end_on_a_step_without_the_value() {
    let config = EngineConfig::instant();

    let mut array = ArrayDriver::with_config(&[4, 7, 9], &config);
    assert_eq!(array.delete(1).await.unwrap(), Some(7));
    let state = array.get_state();
    let last = state.log.steps().last().unwrap();
    assert_eq!(last.kind, Op::Done);
    assert_eq!(last.snapshot.data, vec![4, 9]);

    let mut queue = QueueDriver::with_config(&config);
    queue.enqueue(1).await.unwrap();
    queue.enqueue(2).await.unwrap();
    assert_eq!(queue.dequeue().await.unwrap(), Some(1));
    let state = queue.get_state();
    let last = state.log.steps().last().unwrap();
    assert_eq!(last.kind, Op::Done);
    assert!(!last.snapshot.slots.contains(&Some(1)));
    assert_eq!(last.snapshot.front, Some(1));

    let mut list = LinkedListDriver::with_config(&[1, 2, 3], &config);
    assert_eq!(list.delete(2).await.unwrap(), Some(3));
    let state = list.get_state();
    let last = state.log.steps().last().unwrap();
    assert_eq!(last.snapshot.values, vec![1, 2]);

    let mut tree = BinaryTreeDriver::with_config(&[5, 3, 8], &config);
    assert!(tree.delete(3).await.unwrap());
    let state = tree.get_state();
    let last = state.log.steps().last().unwrap();
    assert_eq!(last.kind, Op::Done);
    assert_eq!(last.snapshot.values(), vec![5, 8]);

    let mut table = HashTableDriver::with_config(&config);
    table.set("apple", "red").await.unwrap();
    assert!(table.delete("apple").await.unwrap());
    let state = table.get_state();
    let last = state.log.steps().last().unwrap();
    assert_eq!(last.kind, Op::Done);
    assert!(last.snapshot.buckets.iter().all(|chain| chain.is_empty()));

    let mut graph = GraphDriver::with_config(&config);
    for id in ["a", "b", "c"] {
        graph.add_node(id, id).await.unwrap();
    }
    graph.add_edge("a", "b", None).await.unwrap();
    graph.add_edge("b", "c", None).await.unwrap();
    assert!(graph.remove_edge("a", "b").await.unwrap());
    let state = graph.get_state();
    let last = state.log.steps().last().unwrap();
    assert_eq!(last.snapshot.edges.len(), 1);

    assert!(graph.remove_node("c").await.unwrap());
    let state = graph.get_state();
    let last = state.log.steps().last().unwrap();
    assert_eq!(last.kind, Op::Done);
    assert!(last.snapshot.nodes.iter().all(|n| n.id != "c"));
    assert!(last.snapshot.edges.is_empty());
    assert!(last.snapshot.highlight_nodes.is_empty());
}
