#![cfg(target_arch = "wasm32")]

use std::sync::Once;
use twig_dom::{h, modules, web::WebHost, Data, Old, Patcher, VNode};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, Element, HtmlBodyElement};

wasm_bindgen_test_configure!(run_in_browser);

static LOG: Once = Once::new();

type V = VNode<WebHost>;

/// A fresh `div` root appended to the body.
fn mount() -> (WebHost, web_sys::Node, Patcher<WebHost>) {
	LOG.call_once(|| {
		//TODO: Fail on Warning or Error.
		tracing_wasm::set_as_global_default();
	});

	let document = window().unwrap().document().unwrap();
	let body = document.body().unwrap().dyn_into::<HtmlBodyElement>().unwrap();
	let root: web_sys::Node = document.create_element("div").unwrap().into();
	body.append_child(&root).unwrap();

	let patcher = twig_dom::init(vec![modules::attributes::module(), modules::class::module(), modules::style::module(), modules::dataset::module()]);
	(WebHost::new(document), root, patcher)
}

fn inner_html(node: &web_sys::Node) -> String {
	node.dyn_ref::<Element>().unwrap().inner_html()
}

fn spans(texts: &[(Option<&'static str>, &str)]) -> V {
	h(
		"div",
		texts
			.iter()
			.map(|&(key, text)| match key {
				Some(key) => h("span", (Data::new().key(key), text)),
				None => h("span", text),
			})
			.collect::<Vec<_>>(),
	)
}

#[wasm_bindgen_test]
fn create_and_remove() {
	let (mut host, root, patcher) = mount();
	let vnode = patcher.patch(&mut host, Old::Element(root.clone()), h("div", [h("p#a.b", Data::new().attr("title", "t").style("color", "red"))])).unwrap();
	assert_eq!(vnode.elm(), Some(&root));
	assert_eq!(inner_html(&root), r#"<p id="a" class="b" title="t" style="color: red;"></p>"#);

	patcher.patch(&mut host, vnode, h("div", ())).unwrap();
	assert_eq!(inner_html(&root), "");
	root.parent_node().unwrap().remove_child(&root).unwrap();
}

#[wasm_bindgen_test]
fn keyed_reorder_keeps_elements() {
	let (mut host, root, patcher) = mount();
	let vnode = patcher.patch(&mut host, Old::Element(root.clone()), spans(&[(Some("1"), "1"), (Some("2"), "2"), (Some("3"), "3")])).unwrap();
	let third = root.last_child().unwrap();

	patcher.patch(&mut host, vnode, spans(&[(Some("3"), "3"), (Some("1"), "1"), (Some("2"), "2")])).unwrap();
	assert_eq!(inner_html(&root), "<span>3</span><span>1</span><span>2</span>");
	assert!(root.first_child().unwrap().is_same_node(Some(&third)));
	root.parent_node().unwrap().remove_child(&root).unwrap();
}

#[wasm_bindgen_test]
fn keyed_benchmark() {
	let (mut host, root, patcher) = mount();
	let steps: [&[(Option<&'static str>, &str)]; 8] = [
		&[(Some("1"), "1"), (Some("2"), "2"), (Some("3"), "3")],
		&[(Some("2"), "2a"), (Some("3"), "3a")],
		&[(Some("3"), "3b")],
		&[(Some("2"), "2c"), (Some("3"), "3c")],
		&[(Some("1"), "1d"), (Some("2"), "2d"), (Some("3"), "3d"), (None, "b")],
		&[(Some("1"), "1e"), (Some("3"), "3e"), (Some("2"), "2e")],
		&[(None, "a"), (None, "b"), (Some("1"), "1f"), (Some("2f"), "2"), (Some("3f"), "3")],
		&[(Some("1"), "1g"), (Some("2"), "2g"), (Some("3"), "3g"), (Some("4"), "4g")],
	];

	let mut vnode = patcher.patch(&mut host, Old::Element(root.clone()), h("div", Data::new())).unwrap();
	for step in steps {
		vnode = patcher.patch(&mut host, vnode, spans(step)).unwrap();
	}
	assert_eq!(inner_html(&root), "<span>1g</span><span>2g</span><span>3g</span><span>4g</span>");
	root.parent_node().unwrap().remove_child(&root).unwrap();
}

#[wasm_bindgen_test]
fn svg_namespace() {
	let (mut host, root, patcher) = mount();
	let vnode = patcher.patch(&mut host, Old::Element(root.clone()), h("div", [h("svg", [h("circle", ())])])).unwrap();
	let circle = vnode.children()[0].children()[0].elm().unwrap().dyn_ref::<Element>().unwrap().clone();
	assert_eq!(circle.namespace_uri().as_deref(), Some(twig_dom::h::SVG_NAMESPACE));
	root.parent_node().unwrap().remove_child(&root).unwrap();
}
