mod common;

use behavior_graph::{
    Graph, GraphBuilder, NodeId, Parallel, Sequence, Status, WaitForAll, WaitForAny,
};
use common::{Board, Probe};

/// `parents` sequences, each holding only the shared join.
fn fan_in(builder: &mut GraphBuilder<Board>, join: NodeId, parents: usize) -> Vec<NodeId> {
    (0..parents)
        .map(|_| builder.add(Sequence::new(vec![join])))
        .collect()
}

#[test]
fn wait_for_all_starts_child_once_every_parent_arrived() {
    let mut builder = Graph::builder(Board::default());
    let child = builder.add(Probe::running("child"));
    let join = builder.add(WaitForAll::new(child));
    let parents = fan_in(&mut builder, join, 3);
    let root = builder.add(Parallel::new(parents.clone()));
    let mut graph = builder.with_root(root).build().unwrap();

    assert_eq!(graph.start(), Status::Waiting);
    assert_eq!(graph.blackboard().count("child:start"), 1);
    assert_eq!(graph.status(join), Status::Waiting);
    for parent in parents {
        assert_eq!(graph.status(parent), Status::Waiting);
    }
}

#[test]
fn wait_for_all_keeps_collecting_with_a_missing_parent() {
    let mut builder = Graph::builder(Board::default());
    let child = builder.add(Probe::running("child"));
    let join = builder.add(WaitForAll::new(child));
    let parents = fan_in(&mut builder, join, 3);
    let mut graph = builder.build().unwrap();

    graph.start_node(parents[0]);
    graph.start_node(parents[1]);
    // Starting the same parent again does not count twice.
    graph.start_node(parents[1]);
    for _ in 0..5 {
        graph.advance(0.1);
    }

    assert_eq!(graph.status(join), Status::Running);
    assert_eq!(graph.blackboard().count("child:start"), 0);

    graph.start_node(parents[2]);
    assert_eq!(graph.status(join), Status::Waiting);
    assert_eq!(graph.blackboard().count("child:start"), 1);
}

#[test]
fn wait_for_all_tears_down_only_after_last_release() {
    let mut builder = Graph::builder(Board::default());
    let child = builder.add(Probe::running("child"));
    let join = builder.add(WaitForAll::new(child));
    let parents = fan_in(&mut builder, join, 2);
    let mut graph = builder.build().unwrap();

    graph.start_node(parents[0]);
    graph.start_node(parents[1]);
    assert_eq!(graph.status(child), Status::Running);

    graph.end_node(parents[0]);
    assert_eq!(graph.status(join), Status::Waiting);
    assert_eq!(graph.blackboard().count("child:end"), 0);
    // Refused while a parent activation is outstanding.
    assert!(!graph.reset_status(join));

    graph.end_node(parents[1]);
    assert_eq!(graph.status(join), Status::Uninitialized);
    assert_eq!(graph.blackboard().count("child:end"), 1);
    assert!(graph.active_nodes().is_empty());
}

#[test]
fn wait_for_all_reports_child_result_to_every_parent() {
    let mut builder = Graph::builder(Board::default());
    let child = builder.add(Probe::one_tick("child"));
    let join = builder.add(WaitForAll::new(child));
    let parents = fan_in(&mut builder, join, 2);
    let root = builder.add(Parallel::new(parents.clone()));
    let mut graph = builder.with_root(root).build().unwrap();

    graph.start();
    let mut status = Status::Waiting;
    for _ in 0..5 {
        status = graph.advance(0.1);
        if status.is_terminal() {
            break;
        }
    }

    assert_eq!(status, Status::Success);
    for parent in parents {
        assert_eq!(graph.status(parent), Status::Success);
    }
    assert_eq!(graph.blackboard().count("child:start"), 1);
    assert_eq!(graph.blackboard().count("child:end"), 1);
}

#[test]
fn wait_for_any_shares_one_activation_per_tick() {
    let mut builder = Graph::builder(Board::default());
    let child = builder.add(Probe::succeeding("child"));
    let join = builder.add(WaitForAny::new(child));
    let parents = fan_in(&mut builder, join, 4);
    let mut graph = builder.build().unwrap();

    let statuses: Vec<Status> = parents.iter().map(|&p| graph.start_node(p)).collect();

    assert_eq!(graph.blackboard().count("child:start"), 1);
    assert!(statuses.iter().all(|&s| s == Status::Success));
    assert_eq!(graph.status(join), Status::Success);
}

#[test]
fn wait_for_any_with_running_child_reports_waiting_to_all() {
    let mut builder = Graph::builder(Board::default());
    let child = builder.add(Probe::running("child"));
    let join = builder.add(WaitForAny::new(child));
    let parents = fan_in(&mut builder, join, 3);
    let root = builder.add(Parallel::new(parents.clone()));
    let mut graph = builder.with_root(root).build().unwrap();

    assert_eq!(graph.start(), Status::Waiting);
    assert_eq!(graph.blackboard().count("child:start"), 1);
    for parent in parents {
        assert_eq!(graph.status(parent), Status::Waiting);
    }
}

#[test]
fn wait_for_any_reevaluates_on_a_later_tick() {
    let mut builder = Graph::builder(Board::default());
    let child = builder.add(Probe::succeeding("child"));
    let join = builder.add(WaitForAny::new(child));
    let parents = fan_in(&mut builder, join, 2);
    let mut graph = builder.build().unwrap();

    // First parent finishes and releases within the tick.
    graph.start_node(parents[0]);
    assert_eq!(graph.blackboard().count("child:start"), 1);

    graph.advance(0.1);
    assert_eq!(graph.start_node(parents[1]), Status::Success);
    assert_eq!(graph.blackboard().count("child:start"), 2);
}

#[test]
fn wait_for_any_joins_child_already_running() {
    let mut builder = Graph::builder(Board::default());
    let child = builder.add(Probe::running("child"));
    let join = builder.add(WaitForAny::new(child));
    let parents = fan_in(&mut builder, join, 2);
    let mut graph = builder.build().unwrap();

    graph.start_node(parents[0]);
    graph.advance(0.1);
    assert_eq!(graph.start_node(parents[1]), Status::Waiting);
    assert_eq!(graph.blackboard().count("child:start"), 1);

    graph.end_node(parents[0]);
    assert_eq!(graph.blackboard().count("child:end"), 0);
    graph.end_node(parents[1]);
    assert_eq!(graph.blackboard().count("child:end"), 1);
}

#[test]
fn join_without_child_fails() {
    let mut builder = Graph::builder(Board::default());
    let any = builder.add(WaitForAny::new(None));
    let all = builder.add(WaitForAll::new(None));
    let mut graph = builder.build().unwrap();

    assert_eq!(graph.start_node(any), Status::Failure);
    assert_eq!(graph.start_node(all), Status::Failure);
}
