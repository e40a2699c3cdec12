use logiflow::{
    Attribution, EdmondsKarp, FlowReport, Network, NodeRecord, PushRelabel, SimpleRoute,
    SolveOptions, Tier,
};

const NODES: &str = include_str!("../demos/logistics/nodes.csv");
const ROUTES: &str = include_str!("../demos/logistics/routes.csv");

fn read<T: serde::de::DeserializeOwned>(data: &str) -> Vec<T> {
    csv::Reader::from_reader(data.as_bytes())
        .deserialize()
        .collect::<Result<_, _>>()
        .unwrap()
}

fn network() -> Network<String, i64> {
    let nodes: Vec<NodeRecord<String>> = read(NODES);
    let routes: Vec<SimpleRoute<String, i64>> = read(ROUTES);
    Network::from_records(nodes, routes).unwrap()
}

fn pair(report: &FlowReport<String, i64>, terminal: &str, shop: &str) -> i64 {
    report.pair_flows[&(terminal.to_string(), shop.to_string())]
}

#[test]
fn demo_network_shape() {
    let n = network();
    assert_eq!(n.node_count(), 22);
    assert_eq!(n.tier_indices(Tier::Terminal), vec![1, 2]);
    assert_eq!(n.tier_indices(Tier::Warehouse), vec![3, 4, 5, 6]);
    assert_eq!(n.tier_indices(Tier::Shop).len(), 14);
    let (_, bound) = n.graph().unwrap();
    assert_eq!(bound, 316);
}

#[test]
fn demo_max_flow() {
    let mut ek = EdmondsKarp::new();
    let report = network()
        .solve(
            &mut ek,
            SolveOptions {
                check: true,
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(report.max_flow, 115);
    assert_eq!(ek.augmentations(), 11);
}

#[test]
fn demo_heuristic_table() {
    let report = network()
        .solve(&mut EdmondsKarp::new(), SolveOptions::default())
        .unwrap();

    let t1 = [15, 10, 0, 15, 10, 5, 15, 10, 0, 0, 0, 0, 0, 0];
    let t2 = [0, 0, 0, 10, 10, 5, 15, 10, 0, 20, 10, 0, 0, 0];
    for (j, (f1, f2)) in t1.iter().zip(t2.iter()).enumerate() {
        let shop = format!("M{}", j + 1);
        assert_eq!(pair(&report, "T1", &shop), *f1, "T1 -> {shop}");
        assert_eq!(pair(&report, "T2", &shop), *f2, "T2 -> {shop}");
    }
    assert_eq!(report.pair_flows.len(), 28);
}

#[test]
fn demo_exact_table() {
    let report = network()
        .solve(
            &mut EdmondsKarp::new(),
            SolveOptions {
                attribution: Attribution::Exact,
                check: true,
            },
        )
        .unwrap();

    assert_eq!(report.pair_flows.values().sum::<i64>(), 115);
    assert_eq!(pair(&report, "T1", "M4"), 15);
    assert_eq!(pair(&report, "T1", "M5"), 5);
    assert_eq!(pair(&report, "T2", "M5"), 5);
    assert_eq!(pair(&report, "T2", "M6"), 5);
    assert_eq!(pair(&report, "T1", "M6"), 0);
    assert_eq!(pair(&report, "T2", "M10"), 20);
    assert_eq!(report.shipped(&"T1".to_string()), 60);
    assert_eq!(report.shipped(&"T2".to_string()), 55);
}

#[test]
fn demo_routes_and_bottlenecks() {
    let report = network()
        .solve(&mut EdmondsKarp::new(), SolveOptions::default())
        .unwrap();

    // Every terminal -> warehouse route is saturated and together they form the minimum cut.
    let bottlenecks: Vec<_> = report
        .bottlenecks
        .iter()
        .map(|(f, t)| format!("{f}->{t}"))
        .collect();
    assert_eq!(
        bottlenecks,
        ["T1->W1", "T1->W2", "T1->W3", "T2->W2", "T2->W3", "T2->W4"]
    );

    let unused: Vec<_> = report
        .assignments
        .iter()
        .filter(|a| a.flow() == 0)
        .map(|a| a.to().as_str())
        .collect();
    assert_eq!(unused, ["M3", "M9", "M12", "M13", "M14"]);

    for shop in ["M3", "M9", "M12", "M13", "M14"] {
        assert_eq!(report.received(&shop.to_string()), 0);
    }
    assert_eq!(report.assignments.len(), 20);
    assert!(report.assignments.iter().all(|a| a.spare() >= Some(0)));
}

#[test]
fn push_relabel_matches_on_demo() {
    let options = SolveOptions {
        attribution: Attribution::Exact,
        check: true,
    };
    let n = network();
    let pr = n.solve(&mut PushRelabel, options).unwrap();
    let ek = n.solve(&mut EdmondsKarp::new(), options).unwrap();
    assert_eq!(pr.max_flow, ek.max_flow);
    assert_eq!(pr.bottlenecks, ek.bottlenecks);
}

#[test]
fn unbounded_routes_parse_from_csv() {
    let routes: Vec<SimpleRoute<String, i64>> =
        read("from,to,capacity\nT1,W1,inf\nW1,M1,7\n");
    let nodes = vec![
        NodeRecord::new("T1".to_string(), Tier::Terminal),
        NodeRecord::new("W1".to_string(), Tier::Warehouse),
        NodeRecord::new("M1".to_string(), Tier::Shop),
    ];
    let report = Network::from_records(nodes, routes)
        .unwrap()
        .solve(&mut EdmondsKarp::new(), SolveOptions::default())
        .unwrap();
    assert_eq!(report.max_flow, 7);
}

#[test]
fn invalid_route_rows_are_rejected() {
    let rows: Result<Vec<SimpleRoute<String, i64>>, _> =
        csv::Reader::from_reader("from,to,capacity\nW1,W1,3\n".as_bytes())
            .deserialize()
            .collect();
    assert!(rows.is_err());

    let rows: Result<Vec<SimpleRoute<String, i64>>, _> =
        csv::Reader::from_reader("from,to,capacity\nW1,M1,-3\n".as_bytes())
            .deserialize()
            .collect();
    assert!(rows.is_err());
}
