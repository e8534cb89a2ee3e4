use camino::Utf8Path;
use netcfg_rest::{CallError, DispatchTree, FAILED, Request, Verb, XmlNode, call_direct};
use netcfg_variant::INVALID_ARGS;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::build_tree;
use crate::hostname::test_support::MockHostname;
use crate::interface::Interface;
use crate::state::DaemonState;
use crate::store::{InterfaceStore, MemoryStore};

struct Harness {
    tree: DispatchTree<DaemonState>,
    state: DaemonState,
    config_dir: TempDir,
}

impl Harness {
    fn call(&self, request: &mut Request) -> Result<(), CallError> {
        call_direct(&self.tree, &self.state, request)
    }

    fn config_root(&self) -> &Utf8Path {
        Utf8Path::from_path(self.config_dir.path()).expect("utf8 temp dir")
    }
}

fn harness_with(hostname: MockHostname) -> Harness {
    let config_dir = TempDir::new().expect("temp dir");
    let system = MemoryStore::new();
    let mut eth0 = Interface::new("eth0");
    eth0.mtu = Some(1500);
    eth0.up = true;
    system.put(eth0).expect("seed eth0");
    system.put(Interface::new("lo")).expect("seed lo");
    let root = Utf8Path::from_path(config_dir.path()).expect("utf8 temp dir");
    Harness {
        tree: build_tree().expect("tree"),
        state: DaemonState::new(system, root, Box::new(hostname)),
        config_dir,
    }
}

#[fixture]
fn harness() -> Harness {
    harness_with(MockHostname::new())
}

fn body(xml: &str) -> XmlNode {
    XmlNode::scan(xml).expect("xml body")
}

fn interface_names(output: &XmlNode) -> Vec<String> {
    output
        .children()
        .iter()
        .filter_map(|node| node.attr("name").map(str::to_owned))
        .collect()
}

#[rstest]
fn system_interfaces_are_listed(harness: Harness) {
    let mut request = Request::new(Verb::Get, "/system/interface");
    harness.call(&mut request).expect("get");
    let output = request.output.expect("listing");
    assert_eq!(output.name(), "interfaces");
    assert_eq!(interface_names(&output), ["eth0", "lo"]);
}

#[rstest]
#[case::plain("/system/interface/eth0")]
#[case::trailing_slash("/system/interface/eth0/")]
fn one_interface_is_returned(harness: Harness, #[case] path: &str) {
    let mut request = Request::new(Verb::Get, path);
    harness.call(&mut request).expect("get");
    let output = request.output.expect("interface");
    assert_eq!(output.attr("name"), Some("eth0"));
    assert_eq!(output.child("mtu").and_then(XmlNode::text), Some("1500"));
}

#[rstest]
fn unknown_interface_fails(harness: Harness) {
    let mut request = Request::new(Verb::Get, "/system/interface/eth9");
    let error = harness.call(&mut request).expect_err("unknown");
    assert_eq!(error.error_name(), FAILED);
    assert_eq!(request.error(), Some("interface eth9 not known"));
}

#[rstest]
fn put_applies_typed_properties(harness: Harness) {
    let mut request = Request::new(Verb::Put, "/system/interface/eth0").with_input(body(
        "<interface name=\"eth0\"><mtu type=\"u\">9000</mtu>\
         <hwaddr type=\"ay\">52:54:00:12:34:56</hwaddr></interface>",
    ));
    harness.call(&mut request).expect("put");

    let stored = harness.state.system().get("eth0").expect("get").expect("eth0");
    assert_eq!(stored.mtu, Some(9000));
    assert!(stored.up);
    assert_eq!(stored.hwaddr, [0x52, 0x54, 0x00, 0x12, 0x34, 0x56]);
    assert_eq!(request.output, Some(stored.to_xml().expect("render")));
}

#[rstest]
#[case::no_name("/system/interface", "<interface name=\"eth0\"/>", "no interface name given")]
#[case::no_element(
    "/system/interface/eth1",
    "<interface name=\"eth0\"/>",
    "cannot find configuration for interface eth1"
)]
#[case::wrong_type(
    "/system/interface/eth0",
    "<interface name=\"eth0\"><mtu type=\"s\">big</mtu></interface>",
    "unexpected type for dict element \"mtu\": expected u, found s"
)]
#[case::nested("/system/interface/eth0/extra", "<interface name=\"eth0\"/>", "excess elements in path")]
fn invalid_puts_are_rejected(
    harness: Harness,
    #[case] path: &str,
    #[case] xml: &str,
    #[case] message: &str,
) {
    let mut request = Request::new(Verb::Put, path).with_input(body(xml));
    let error = harness.call(&mut request).expect_err("rejected");
    assert_eq!(error.error_name(), INVALID_ARGS);
    assert_eq!(request.error(), Some(message));
    assert_eq!(
        harness.state.system().get("eth0").expect("get").and_then(|i| i.mtu),
        Some(1500)
    );
}

#[rstest]
#[case::no_name("/system/interface", "DELETE: no interface name given")]
#[case::unknown("/system/interface/eth9", "unable to delete eth9")]
fn invalid_deletes_are_rejected(harness: Harness, #[case] path: &str, #[case] message: &str) {
    let mut request = Request::new(Verb::Delete, path);
    harness.call(&mut request).expect_err("rejected");
    assert_eq!(request.error(), Some(message));
}

#[rstest]
fn delete_removes_interface(harness: Harness) {
    let mut request = Request::new(Verb::Delete, "/system/interface/lo");
    harness.call(&mut request).expect("delete");
    assert_eq!(request.output, None);
    assert_eq!(harness.state.system().get("lo").expect("get"), None);
}

#[rstest]
fn config_store_uses_default_root(harness: Harness) {
    let mut put = Request::new(Verb::Put, "/config/interface/br0").with_input(body(
        "<interfaces><interface name=\"br0\"><alias>lan bridge</alias></interface></interfaces>",
    ));
    harness.call(&mut put).expect("put");
    assert!(harness.config_root().join("ifcfg-br0.xml").is_file());

    let mut get = Request::new(Verb::Get, "/config/interface");
    harness.call(&mut get).expect("get");
    let output = get.output.expect("listing");
    assert_eq!(interface_names(&output), ["br0"]);
    let br0 = output.child("interface").expect("br0");
    assert_eq!(br0.child("alias").and_then(XmlNode::text), Some("lan bridge"));
}

#[rstest]
fn root_option_selects_another_store(harness: Harness) {
    let other = TempDir::new().expect("temp dir");
    let other_root = other.path().to_str().expect("utf8 temp dir");
    let mut put = Request::new(Verb::Put, "/config/interface/eth0")
        .with_input(body("<interface name=\"eth0\"><up type=\"b\">true</up></interface>"));
    put.add_option("root", other_root).expect("option");
    harness.call(&mut put).expect("put");

    assert!(other.path().join("ifcfg-eth0.xml").is_file());
    assert!(!harness.config_root().join("ifcfg-eth0.xml").exists());

    let mut delete = Request::new(Verb::Delete, "/config/interface/eth0");
    delete.add_option("root", other_root).expect("option");
    harness.call(&mut delete).expect("delete");
    assert!(!other.path().join("ifcfg-eth0.xml").exists());
}

#[test]
fn hostname_is_read_from_source() {
    let mut source = MockHostname::new();
    source
        .expect_hostname()
        .once()
        .returning(|| Ok("gw.example.net".to_owned()));
    let harness = harness_with(source);

    let mut request = Request::new(Verb::Get, "/system/hostname");
    harness.call(&mut request).expect("get");
    assert_eq!(
        request.output,
        Some(XmlNode::new("hostname").with_text("gw.example.net"))
    );
}

#[test]
fn hostname_put_trims_and_applies() {
    let mut source = MockHostname::new();
    source
        .expect_set_hostname()
        .withf(|name| name == "edge-1")
        .once()
        .returning(|_| Ok(()));
    let harness = harness_with(source);

    let mut request = Request::new(Verb::Put, "/system/hostname")
        .with_input(body("<hostname>  edge-1\n</hostname>"));
    harness.call(&mut request).expect("put");
    assert_eq!(request.output, Some(XmlNode::new("hostname").with_text("edge-1")));
}

#[rstest]
#[case::excess("/system/hostname/extra", Some("<hostname>a</hostname>"), "excess elements in path")]
#[case::missing("/system/hostname", None, "bad or missing XML document")]
#[case::wrong_element("/system/hostname", Some("<name>a</name>"), "bad or missing XML document")]
#[case::blank("/system/hostname", Some("<hostname>   </hostname>"), "bad or missing XML document")]
#[case::space("/system/hostname", Some("<hostname>edge 1</hostname>"), "illegal character in hostname")]
#[case::non_ascii("/system/hostname", Some("<hostname>r\u{e9}seau</hostname>"), "illegal character in hostname")]
fn bad_hostnames_never_reach_the_source(
    harness: Harness,
    #[case] path: &str,
    #[case] xml: Option<&str>,
    #[case] message: &str,
) {
    let mut request = Request::new(Verb::Put, path);
    request.input = xml.map(body);
    harness.call(&mut request).expect_err("rejected");
    assert_eq!(request.error(), Some(message));
}

#[rstest]
fn meta_describes_the_namespace(harness: Harness) {
    let mut request = Request::new(Verb::Get, "/meta");
    harness.call(&mut request).expect("get");
    let meta = request.output.expect("meta");
    let system = meta.child("system").expect("system");
    let hostname = system.child("hostname").expect("hostname");
    assert_eq!(hostname.attr("get"), Some(""));
    assert_eq!(hostname.attr("put"), Some(""));
    assert_eq!(hostname.attr("delete"), None);
    assert!(meta.child("config").and_then(|c| c.child("interface")).is_some());
}

#[rstest]
fn meta_rejects_remainder(harness: Harness) {
    let mut request = Request::new(Verb::Get, "/meta/x");
    harness.call(&mut request).expect_err("rejected");
    assert_eq!(request.error(), Some("excess elements in path"));
}

#[rstest]
fn root_has_no_handlers(harness: Harness) {
    let mut request = Request::new(Verb::Get, "/");
    let error = harness.call(&mut request).expect_err("no handler");
    assert!(matches!(error, CallError::MethodNotSupported { .. }));
}
