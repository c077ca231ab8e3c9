/* tests/cluster.rs */

use chunkr::client::{self, ClientError};
use chunkr::cluster::Topology;
use chunkr::node::StorageNode;
use chunkr::store::FileMeta;
use chunkr::wire::exchange::round_trip;
use chunkr::wire::message::{Reply, Request};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::Instant;

const KIB: usize = 1024;
const PEER_TIMEOUT: Duration = Duration::from_millis(300);

struct TestCluster {
    addrs: Vec<String>,
    dirs: Vec<PathBuf>,
    handles: Vec<Option<JoinHandle<()>>>,
    _root: TempDir,
}

impl TestCluster {
    async fn start(size: usize, chunk_size: usize) -> Self {
        Self::start_with(size, chunk_size, None).await
    }

    /// Like `start`, but slot `silent` accepts connections and never answers.
    async fn start_with(size: usize, chunk_size: usize, silent: Option<usize>) -> Self {
        let root = TempDir::new().unwrap();
        let mut listeners = Vec::with_capacity(size);
        for _ in 0..size {
            listeners.push(TcpListener::bind("127.0.0.1:0").await.unwrap());
        }
        let addrs: Vec<String> = listeners
            .iter()
            .map(|l| l.local_addr().unwrap().to_string())
            .collect();
        let topology = Arc::new(
            Topology::new(addrs.clone(), chunk_size).with_peer_timeout(PEER_TIMEOUT),
        );

        let mut dirs = Vec::with_capacity(size);
        let mut handles = Vec::with_capacity(size);
        for (index, listener) in listeners.into_iter().enumerate() {
            let dir = root.path().join(format!("node_{}", index));
            if silent == Some(index) {
                tokio::spawn(hold_connections(listener));
                handles.push(None);
            } else {
                let node = StorageNode::open(topology.clone(), index, &dir).await.unwrap();
                handles.push(Some(tokio::spawn(node.serve(listener))));
            }
            dirs.push(dir);
        }

        TestCluster {
            addrs,
            dirs,
            handles,
            _root: root,
        }
    }

    fn addr(&self, index: usize) -> &str {
        &self.addrs[index]
    }

    fn part_file(&self, node: usize, filename: &str, index: u32) -> PathBuf {
        self.dirs[node].join(format!("{}.part{}", filename, index))
    }

    /// Sends SHUTDOWN and waits until the node has stopped listening.
    async fn stop(&mut self, index: usize) {
        client::shutdown(self.addr(index)).await.unwrap();
        if let Some(handle) = self.handles[index].take() {
            handle.await.unwrap();
        }
    }
}

// Accepts and keeps every connection open without reading or replying.
async fn hold_connections(listener: TcpListener) {
    let mut held = Vec::new();
    while let Ok((socket, _)) = listener.accept().await {
        held.push(socket);
    }
}

fn sample_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

#[tokio::test]
async fn four_node_scenario_places_parts_and_survives_a_stopped_node() {
    let mut cluster = TestCluster::start(4, 128 * KIB).await;
    let data = sample_bytes(300 * KIB);

    client::upload(cluster.addr(0), "f.bin", data.clone()).await.unwrap();

    // parts: 0 -> {0,1}, 1 -> {1,2}, 2 -> {2,3}
    let expected = [(0u32, [0usize, 1], 128 * KIB), (1, [1, 2], 128 * KIB), (2, [2, 3], 44 * KIB)];
    for (index, holders, len) in expected {
        for node in 0..4 {
            let path = cluster.part_file(node, "f.bin", index);
            if holders.contains(&node) {
                assert_eq!(std::fs::metadata(&path).unwrap().len() as usize, len);
            } else {
                assert!(!path.exists(), "part {} unexpectedly on node {}", index, node);
            }
        }
    }

    for node in 0..4 {
        assert_eq!(client::list(cluster.addr(node)).await.unwrap(), vec!["f.bin"]);
        assert_eq!(client::download(cluster.addr(node), "f.bin").await.unwrap(), data);
    }

    cluster.stop(1).await;
    assert_eq!(client::download(cluster.addr(3), "f.bin").await.unwrap(), data);
    assert_eq!(client::download(cluster.addr(0), "f.bin").await.unwrap(), data);
}

#[tokio::test]
async fn both_holders_down_reports_the_missing_part() {
    let mut cluster = TestCluster::start(4, 128 * KIB).await;
    client::upload(cluster.addr(0), "f.bin", sample_bytes(300 * KIB)).await.unwrap();

    cluster.stop(1).await;
    cluster.stop(2).await;

    match client::download(cluster.addr(0), "f.bin").await {
        Err(ClientError::Rejected(status)) => assert_eq!(status, "ERR Missing part 1"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn primary_without_the_part_falls_back_to_backup() {
    let cluster = TestCluster::start(4, 128 * KIB).await;
    let data = sample_bytes(300 * KIB);
    client::upload(cluster.addr(0), "f.bin", data.clone()).await.unwrap();

    // part 1 lives on node 1 (primary) and node 2 (backup)
    std::fs::remove_file(cluster.part_file(1, "f.bin", 1)).unwrap();

    let get_part = |index| Request::GetPart {
        filename: "f.bin".to_string(),
        index,
    };
    let reply = round_trip(cluster.addr(1), &get_part(1)).await.unwrap();
    assert_eq!(reply, Reply::Err("ERR".to_string()));
    match round_trip(cluster.addr(2), &get_part(1)).await.unwrap() {
        Reply::Blob(part) => assert_eq!(part, data[128 * KIB..256 * KIB]),
        other => panic!("unexpected reply: {:?}", other),
    }

    assert_eq!(client::download(cluster.addr(3), "f.bin").await.unwrap(), data);
    assert_eq!(client::download(cluster.addr(0), "f.bin").await.unwrap(), data);
}

#[tokio::test]
async fn silent_primary_times_out_and_backup_serves() {
    let mut cluster = TestCluster::start_with(3, 4, Some(1)).await;
    let data = b"0123456789".to_vec();

    // parts 0 -> {0,1}, 1 -> {1,2}, 2 -> {2,0}
    client::upload(cluster.addr(0), "s.txt", data.clone()).await.unwrap();

    let started = Instant::now();
    assert_eq!(client::download(cluster.addr(0), "s.txt").await.unwrap(), data);
    assert!(started.elapsed() < PEER_TIMEOUT * 4);

    cluster.stop(2).await;
    match client::download(cluster.addr(0), "s.txt").await {
        Err(ClientError::Rejected(status)) => assert_eq!(status, "ERR Missing part 1"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn upload_to_a_degraded_cluster_still_answers_ok() {
    let mut cluster = TestCluster::start(3, 4).await;
    cluster.stop(2).await;

    let data = b"0123456789".to_vec();
    client::upload(cluster.addr(0), "d.txt", data.clone()).await.unwrap();
    // parts 0 -> {0,1}, 1 -> {1,2}, 2 -> {2,0}; every part keeps one live copy
    assert_eq!(client::download(cluster.addr(1), "d.txt").await.unwrap(), data);
}

#[tokio::test]
async fn reupload_replaces_content() {
    let cluster = TestCluster::start(3, 8).await;

    client::upload(cluster.addr(0), "notes.txt", b"first version of the notes".to_vec())
        .await
        .unwrap();
    client::upload(cluster.addr(1), "notes.txt", b"second".to_vec()).await.unwrap();

    for node in 0..3 {
        assert_eq!(
            client::download(cluster.addr(node), "notes.txt").await.unwrap(),
            b"second".to_vec()
        );
    }
}

#[tokio::test]
async fn unknown_file_is_reported() {
    let cluster = TestCluster::start(2, 16).await;
    match client::download(cluster.addr(1), "ghost").await {
        Err(ClientError::Rejected(status)) => assert_eq!(status, "ERR No such file"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn listing_is_sorted_and_per_node() {
    let cluster = TestCluster::start(3, 16).await;
    client::upload(cluster.addr(0), "b.txt", b"bee".to_vec()).await.unwrap();
    client::upload(cluster.addr(0), "a.txt", b"ay".to_vec()).await.unwrap();

    let reply = round_trip(
        cluster.addr(2),
        &Request::PutMeta {
            filename: "zz.txt".to_string(),
            meta: FileMeta {
                parts: 1,
                total_size: 3,
            },
        },
    )
    .await
    .unwrap();
    assert_eq!(reply, Reply::Ok);

    assert_eq!(client::list(cluster.addr(0)).await.unwrap(), vec!["a.txt", "b.txt"]);
    assert_eq!(
        client::list(cluster.addr(2)).await.unwrap(),
        vec!["a.txt", "b.txt", "zz.txt"]
    );
}

#[tokio::test]
async fn unknown_command_is_answered_with_err() {
    let cluster = TestCluster::start(1, 16).await;
    let reply = round_trip(cluster.addr(0), &Request::Unknown("FROB".to_string()))
        .await
        .unwrap();
    assert_eq!(reply, Reply::Err("ERR Unknown command".to_string()));

    // the node keeps serving afterwards
    assert!(client::list(cluster.addr(0)).await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_filename_is_refused() {
    let cluster = TestCluster::start(1, 16).await;
    match client::upload(cluster.addr(0), "../escape", b"x".to_vec()).await {
        Err(ClientError::Rejected(status)) => assert_eq!(status, "ERR Invalid filename"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn single_node_round_trip() {
    let cluster = TestCluster::start(1, 5).await;
    let data = sample_bytes(23);
    client::upload(cluster.addr(0), "solo.bin", data.clone()).await.unwrap();

    for index in 0..5 {
        assert!(cluster.part_file(0, "solo.bin", index).exists());
    }
    assert_eq!(client::download(cluster.addr(0), "solo.bin").await.unwrap(), data);
}

#[tokio::test]
async fn empty_file_round_trips() {
    let cluster = TestCluster::start(2, 16).await;
    client::upload(cluster.addr(0), "empty", Vec::new()).await.unwrap();

    assert_eq!(client::list(cluster.addr(1)).await.unwrap(), vec!["empty"]);
    assert!(client::download(cluster.addr(1), "empty").await.unwrap().is_empty());
}

#[tokio::test]
async fn metadata_survives_a_restart() {
    let mut cluster = TestCluster::start(1, 4).await;
    let data = b"persisted bytes".to_vec();
    client::upload(cluster.addr(0), "keep.txt", data.clone()).await.unwrap();
    cluster.stop(0).await;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let topology = Arc::new(Topology::new(vec![addr.clone()], 4));
    let node = StorageNode::open(topology, 0, &cluster.dirs[0]).await.unwrap();
    let handle = tokio::spawn(node.serve(listener));

    assert_eq!(client::list(&addr).await.unwrap(), vec!["keep.txt"]);
    assert_eq!(client::download(&addr, "keep.txt").await.unwrap(), data);

    client::shutdown(&addr).await.unwrap();
    handle.await.unwrap();
}
