use bencode_metainfo::{
    Value,
    decoding::{decode, from_reader},
    encoding::encode,
    metainfo::{FileLayout, InfoHash, Metainfo, Reason},
};

const INFO: &[u8] = b"d5:filesld6:lengthi5e4:pathl3:sub5:a.bineed6:lengthi7e4:pathl5:b.txteee\
    4:name3:dir12:piece lengthi8e6:pieces40:AAAAAAAAAAAAAAAAAAAABBBBBBBBBBBBBBBBBBBBe";

const INFO_HASH: &str = "3410bafb2f6e8cf1d3d5a7f0a3740a1dd588c5e2";

fn torrent(before_info: &[u8], info: &[u8], after_info: &[u8]) -> Vec<u8> {
    let mut bytes = b"d".to_vec();
    bytes.extend_from_slice(before_info);
    bytes.extend_from_slice(b"4:info");
    bytes.extend_from_slice(info);
    bytes.extend_from_slice(after_info);
    bytes.push(b'e');
    bytes
}

fn info_hash(bytes: &[u8]) -> InfoHash {
    let value = decode(bytes).unwrap();
    Metainfo::from_value(&value).unwrap().info_hash()
}

#[test]
fn multi_file_torrent() {
    let bytes = torrent(
        b"8:announce12:udp://a:80/x13:announce-listll12:udp://a:80/xel12:http://b/annee",
        INFO,
        b"",
    );
    let value = decode(&bytes).unwrap();
    let meta = Metainfo::from_value(&value).unwrap();

    assert_eq!(meta.name(), "dir");
    assert_eq!(meta.trackers(), ["udp://a:80/x", "http://b/ann"]);
    assert_eq!(meta.total_length(), 12);
    assert_eq!(meta.piece_count(), 2);
    assert_eq!(meta.piece_size(0), Some(8));
    assert_eq!(meta.piece_size(1), Some(4));
    assert_eq!(meta.piece_hash(1), Some(&[b'B'; 20]));
    assert!(!meta.is_private());

    let FileLayout::Multi { files } = meta.files() else {
        panic!("expected a multi-file layout, got {:?}", meta.files());
    };
    let paths: Vec<_> = files.iter().map(|file| file.joined_path()).collect();
    assert_eq!(paths, ["sub/a.bin", "b.txt"]);
    assert_eq!(files[1].offset, 5);

    assert_eq!(meta.info_hash().to_hex(), INFO_HASH);
}

#[test]
fn info_hash_ignores_keys_outside_info() {
    let plain = torrent(b"8:announce1:a", INFO, b"");
    let decorated = torrent(
        b"8:announce1:b7:comment5:hello10:created by3:foo13:creation datei5e",
        INFO,
        b"3:zzzi1e",
    );
    assert_eq!(info_hash(&plain), info_hash(&decorated));
    assert_eq!(info_hash(&plain), InfoHash::from_hex(INFO_HASH).unwrap());
}

#[test]
fn info_hash_changes_with_info() {
    let changed = INFO.iter().map(|&b| if b == b'B' { b'C' } else { b }).collect::<Vec<_>>();
    assert_ne!(
        info_hash(&torrent(b"8:announce1:a", INFO, b"")),
        info_hash(&torrent(b"8:announce1:a", &changed, b""))
    );
}

#[test]
fn info_hash_uses_canonical_encoding() {
    // Same info dictionary with its keys out of order.
    let unsorted: &[u8] = b"d4:name3:dir12:piece lengthi8e6:pieces40:\
        AAAAAAAAAAAAAAAAAAAABBBBBBBBBBBBBBBBBBBB\
        5:filesld6:lengthi5e4:pathl3:sub5:a.bineed6:lengthi7e4:pathl5:b.txteeee";
    assert_eq!(encode(&decode(unsorted).unwrap()), INFO);
    assert_eq!(
        info_hash(&torrent(b"8:announce1:a", unsorted, b"")).to_hex(),
        INFO_HASH
    );
}

#[test]
fn info_hash_is_memoized() {
    let bytes = torrent(b"8:announce1:a", INFO, b"");
    let value = decode(&bytes).unwrap();
    let meta = Metainfo::from_value(&value).unwrap();
    let first = meta.info_hash();
    assert_eq!(meta.info_hash(), first);
    assert_eq!(meta.clone().info_hash(), first);
}

#[test]
fn view_over_owned_value_from_reader() {
    let bytes = torrent(b"8:announce1:a", INFO, b"");
    let value: Value<'static> = from_reader(bytes.as_slice(), bytes.len()).unwrap();
    drop(bytes);
    let meta = Metainfo::from_value(&value).unwrap();
    assert_eq!(meta.info_hash().to_hex(), INFO_HASH);
}

#[test]
fn views_are_shareable_across_threads() {
    let bytes = torrent(b"8:announce1:a", INFO, b"");
    let value = decode(&bytes).unwrap();
    let meta = Metainfo::from_value(&value).unwrap();

    let hashes: Vec<InfoHash> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| meta.info_hash())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(hashes.iter().all(|hash| hash.to_hex() == INFO_HASH));
}

#[test]
fn rejects_path_traversal() {
    let info = b"d5:filesld6:lengthi1e4:pathl2:..6:passwdeee4:name1:x12:piece lengthi1e6:pieces0:e";
    let bytes = torrent(b"8:announce1:a", info, b"");
    let value = decode(&bytes).unwrap();
    let err = Metainfo::from_value(&value).unwrap_err();
    assert_eq!(err.reason(), &Reason::UnsafePath("..".into()));
    assert_eq!(err.to_string(), "invalid metainfo: unsafe path segment \"..\"");
}
