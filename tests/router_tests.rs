use netroute::{
    CancellationToken, EdgeList, Error, Graph, HeapType, Matrix, Router, RouterConfig,
    UnknownVertexPolicy, UNREACHABLE,
};

fn town_edges() -> EdgeList<String> {
    let names = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    EdgeList::new(
        names(&["depot", "market", "square", "depot"]),
        names(&["market", "square", "harbour", "square"]),
        vec![2.0, 2.0, 3.0, 5.0],
    )
    .with_reverse_edges()
}

fn ids(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_string_ids_round_trip() {
    let router = Router::new(town_edges(), RouterConfig::new()).unwrap();
    assert_eq!(router.vertices().len(), 4);
    assert_eq!(router.graph().edge_count(), 8);

    let m = router
        .distance_matrix(&ids(&["depot", "harbour"]), &ids(&["harbour", "depot"]))
        .unwrap();
    assert_eq!(m.row(0), &[7.0, 0.0][..]);
    assert_eq!(m.row(1), &[0.0, 7.0][..]);

    let paths = router.paths(&ids(&["harbour"]), &ids(&["market"])).unwrap();
    assert_eq!(paths[0][0], ids(&["harbour", "square", "market"]));
}

#[test]
fn test_heap_selection_by_name() {
    for name in ["BHeap", "fheap", "HEAP23", "TriHeap", "radix", "Set", "linear"] {
        let config = RouterConfig::new().with_heap_name(name).unwrap();
        let router = Router::new(town_edges(), config).unwrap();
        let m = router.distance_matrix(&ids(&["depot"]), &ids(&["harbour"])).unwrap();
        assert_eq!(m.get(0, 0), 7.0, "{}", name);
    }
    assert!(matches!(
        RouterConfig::new().with_heap_name("pairing"),
        Err(Error::UnknownHeapType(_))
    ));
    assert!(matches!("".parse::<HeapType>(), Err(Error::UnknownHeapType(_))));
}

#[test]
fn test_unknown_vertex_policies() {
    let strict = Router::new(town_edges(), RouterConfig::new()).unwrap();
    assert!(matches!(
        strict.distance_matrix(&ids(&["depot"]), &ids(&["airport"])),
        Err(Error::UnknownVertex(_))
    ));

    let config = RouterConfig::new().with_unknown_vertex_policy(UnknownVertexPolicy::Skip);
    let lenient = Router::new(town_edges(), config).unwrap();
    let m = lenient
        .distance_matrix(&ids(&["airport", "depot"]), &ids(&["airport", "market"]))
        .unwrap();
    assert_eq!(m.row(0), &[UNREACHABLE, UNREACHABLE][..]);
    assert_eq!(m.row(1), &[UNREACHABLE, 2.0][..]);

    let nodes = ids(&["depot", "airport", "market"]);
    let interaction = lenient
        .spatial_interaction(&nodes, &[1.0, 5.0, 3.0], 1.0)
        .unwrap();
    assert_eq!(interaction.row(1), &[0.0, 0.0, 0.0][..]);
    assert_eq!(interaction.get(0, 1), 0.0);
    assert_eq!(interaction.get(0, 2), 3.0 * (-2.0f64).exp());
}

#[test]
fn test_spatial_interaction_rows() {
    let router = Router::new(town_edges(), RouterConfig::new().with_threads(2)).unwrap();
    let nodes = ids(&["depot", "square", "harbour"]);
    let density = [2.0, 1.0, 0.5];
    let k = 0.25;
    let m = router.spatial_interaction(&nodes, &density, k).unwrap();

    let d = [[0.0, 4.0, 7.0], [4.0, 0.0, 3.0], [7.0, 3.0, 0.0]];
    for i in 0..3 {
        for j in 0..3 {
            assert_eq!(m.get(i, j), density[j] * (-k * d[i][j]).exp());
        }
        let row = router.one_spatial_interaction(&nodes, &density, k, i).unwrap();
        assert_eq!(row.as_slice(), m.row(i));
    }

    assert!(matches!(
        router.spatial_interaction(&nodes, &density, 0.0),
        Err(Error::InvalidParameter(_))
    ));
    assert!(matches!(
        router.spatial_interaction(&nodes, &density[..2], k),
        Err(Error::InvalidParameter(_))
    ));
    assert!(matches!(
        router.one_spatial_interaction(&nodes, &density, k, 3),
        Err(Error::InvalidParameter(_))
    ));
}

#[test]
fn test_cancelled_batches_report_cancelled() {
    let token = CancellationToken::new();
    let router = Router::new(town_edges(), RouterConfig::new())
        .unwrap()
        .with_cancellation(token.clone());
    let all = ids(&["depot", "market", "square", "harbour"]);
    assert!(router.distance_matrix(&all, &all).is_ok());

    token.cancel();
    assert!(matches!(router.distance_matrix(&all, &all), Err(Error::Cancelled)));
    assert!(matches!(router.paths(&all, &all), Err(Error::Cancelled)));
    let flows = Matrix::filled(4, 4, 1.0);
    assert!(matches!(router.flows_aggregate(&all, &all, &flows), Err(Error::Cancelled)));
    assert!(matches!(
        router.flows_disperse(&all, &[1.0; 4], 1.0),
        Err(Error::Cancelled)
    ));
    assert!(matches!(
        router.one_spatial_interaction(&all, &[1.0; 4], 1.0, 0),
        Err(Error::Cancelled)
    ));
}

#[test]
fn test_invalid_graph_and_config() {
    let edges = EdgeList::new(vec![1, 2], vec![2, 3], vec![1.0, -1.0]);
    assert!(matches!(
        Router::new(edges, RouterConfig::new()),
        Err(Error::GraphConstruction(_))
    ));
    let edges = EdgeList::new(vec![1], vec![2], vec![f64::NAN]);
    assert!(matches!(
        Router::new(edges, RouterConfig::new()),
        Err(Error::GraphConstruction(_))
    ));
    let edges = EdgeList::new(vec![1], vec![2], vec![1.0]);
    assert!(matches!(
        Router::new(edges, RouterConfig::new().with_chunk_size(0)),
        Err(Error::InvalidParameter(_))
    ));
    assert!(matches!(
        RouterConfig::from_json(r#"{ "heap": "pairing" }"#),
        Err(Error::UnknownHeapType(_))
    ));
}
