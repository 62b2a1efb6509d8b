use tracing_subscriber::EnvFilter;
use twig_dom::{
	h,
	memory::{MemoryHost, Mutation, NodeId},
	modules, Data, Host, Old, Patcher, VNode,
};

type V = VNode<MemoryHost>;

fn log() {
	let _ = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_test_writer().try_init();
}

fn setup() -> (MemoryHost, NodeId, Patcher<MemoryHost>) {
	log();
	let mut host = MemoryHost::new();
	let body = host.create_element("body", None).unwrap();
	let root = host.create_element("div", None).unwrap();
	host.append_child(&body, &root).unwrap();
	let patcher = twig_dom::init(vec![modules::attributes::module(), modules::class::module(), modules::style::module(), modules::dataset::module()]);
	(host, root, patcher)
}

/// Patches `views` in sequence into a fresh root and returns the host alongside the element of the last view's only child.
fn render(views: impl IntoIterator<Item = V>) -> (MemoryHost, NodeId) {
	let (mut host, root, patcher) = setup();
	let mut vnode = patcher.patch(&mut host, Old::Element(root), h("div", ())).unwrap();
	for view in views {
		vnode = patcher.patch(&mut host, vnode, h("div", [view])).unwrap();
	}
	let child = host.children(root)[0];
	(host, child)
}

#[test]
fn attributes() {
	let (host, a) = render([h("a", Data::new().attr("href", "/one").attr("hidden", true).attr("tabindex", 2))]);
	assert_eq!(host.attribute(a, "href"), Some("/one"));
	assert_eq!(host.attribute(a, "hidden"), Some(""));
	assert_eq!(host.attribute(a, "tabindex"), Some("2"));

	let (host, a) = render([
		h("a", Data::new().attr("href", "/one").attr("hidden", true).attr("title", "t")),
		h("a", Data::new().attr("href", "/two").attr("hidden", false)),
	]);
	assert_eq!(host.attribute(a, "href"), Some("/two"));
	assert_eq!(host.attribute(a, "hidden"), None);
	assert_eq!(host.attribute(a, "title"), None);
}

#[test]
fn classes() {
	let (host, p) = render([h("p.base", Data::new().class("on", true).class("off", false))]);
	assert!(host.has_class(p, "base"));
	assert!(host.has_class(p, "on"));
	assert!(!host.has_class(p, "off"));

	let (host, p) = render([h("p.base", Data::new().class("on", true).class("gone", true)), h("p.base", Data::new().class("on", false))]);
	assert!(host.has_class(p, "base"));
	assert!(!host.has_class(p, "on"));
	assert!(!host.has_class(p, "gone"));
}

#[test]
fn styles() {
	let (host, p) = render([h("p", Data::new().style("color", "red").style("margin", "0"))]);
	assert_eq!(host.to_html(p), "<p style=\"color: red;margin: 0;\"></p>");

	let (host, p) = render([h("p", Data::new().style("color", "red").style("margin", "0")), h("p", Data::new().style("color", "blue"))]);
	assert_eq!(host.style(p, "color"), Some("blue"));
	assert_eq!(host.style(p, "margin"), None);
}

#[test]
fn dataset() {
	let (host, p) = render([h("p", Data::new().dataset("userId", "7"))]);
	assert_eq!(host.attribute(p, "data-user-id"), Some("7"));

	let (host, p) = render([h("p", Data::new().dataset("userId", "7").dataset("role", "x")), h("p", Data::new().dataset("role", "y"))]);
	assert_eq!(host.attribute(p, "data-user-id"), None);
	assert_eq!(host.attribute(p, "data-role"), Some("y"));
}

#[test]
fn unchanged_data_is_not_reapplied() {
	let (mut host, root, patcher) = setup();
	let view = || -> V {
		h(
			"div",
			[h("p.base", Data::new().attr("title", "t").class("on", true).style("color", "red").dataset("id", "1")), h("span", "text")],
		)
	};
	let vnode = patcher.patch(&mut host, Old::Element(root), view()).unwrap();
	host.take_log();

	patcher.patch(&mut host, vnode, view()).unwrap();
	assert_eq!(host.log(), Vec::<Mutation>::new());
}

#[test]
fn modules_apply_on_creation() {
	let (mut host, root, patcher) = setup();
	let vnode = patcher.patch(&mut host, Old::Element(root), h("div", [h("i", Data::new().attr("id", "x"))])).unwrap();
	let i = host.children(root)[0];
	assert_eq!(host.to_html(i), "<i id=\"x\"></i>");
	assert!(host.log().contains(&Mutation::SetAttribute { node: i, name: "id".to_owned() }));
	assert_eq!(vnode.children()[0].elm(), Some(&i));
}
