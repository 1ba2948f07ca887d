use real_dom::{
	element,
	memory::{MemoryHost, Mutation, NodeId},
	reconcile::{instantiate, reconcile, reconcile_children},
	Element, Host, Listener, PropertyBag, Root, ValidationError, Value, CHILDREN, DEFAULT_DEPTH_LIMIT,
};

fn setup() -> (MemoryHost, NodeId, Root<NodeId>) {
	let mut host = MemoryHost::new();
	let container = host.create_element("body");
	(host, container, Root::new(container))
}

fn child(host: &MemoryHost, node: NodeId, path: &[usize]) -> NodeId {
	path.iter().fold(node, |node, &i| host.children(node)[i])
}

#[test]
fn mount_appends_to_container() {
	let (mut host, container, mut root) = setup();
	root.render(&mut host, element!("div", { "id" => "container" }, element!("p", "hello"))).unwrap();

	assert_eq!(host.inner_html(container), r#"<div id="container"><p>hello</p></div>"#);
	let instance = root.instance().unwrap();
	assert_eq!(*instance.host_node(), child(&host, container, &[0]));
	assert_eq!(*instance.descendant(&[0, 0]).unwrap().host_node(), child(&host, container, &[0, 0, 0]));
}

#[test]
fn identity_is_preserved_while_types_stay() {
	let (mut host, container, mut root) = setup();
	let tree = |n: i32, class: &'static str| element!("div", { "className" => class }, element!("span", "n = ", n), element!("input", { "value" => n }));

	root.render(&mut host, tree(0, "a")).unwrap();
	host.take_mutations();
	let before = [child(&host, container, &[0]), child(&host, container, &[0, 0]), child(&host, container, &[0, 0, 1]), child(&host, container, &[0, 1])];

	for n in 1..5 {
		root.render(&mut host, tree(n, if n % 2 == 0 { "a" } else { "b" })).unwrap();
		let after = [child(&host, container, &[0]), child(&host, container, &[0, 0]), child(&host, container, &[0, 0, 1]), child(&host, container, &[0, 1])];
		assert_eq!(before, after);
		assert!(!host.take_mutations().iter().any(Mutation::is_structural));
	}

	assert_eq!(host.inner_html(container), r#"<div className="a"><span>n = 4</span><input value="4"></input></div>"#);
}

#[test]
fn type_change_replaces_in_place() {
	let (mut host, container, mut root) = setup();
	root.render(&mut host, element!("div", element!("p", "first"), element!("button", "second"), element!("p", "third"))).unwrap();
	let old_button = child(&host, container, &[0, 1]);

	root.render(&mut host, element!("div", element!("p", "first"), element!("a", { "href" => "h" }, "second"), element!("p", "third"))).unwrap();
	let new_link = child(&host, container, &[0, 1]);

	assert_ne!(old_button, new_link);
	assert_eq!(host.tag(new_link), Some("a"));
	assert_eq!(host.parent(old_button), None);
	assert_eq!(host.inner_html(container), r#"<div><p>first</p><a href="h">second</a><p>third</p></div>"#);
}

#[test]
fn positional_update_scenario() {
	let mut host = MemoryHost::new();
	let container = host.create_element("body");
	let instance = instantiate(&mut host, &element!("div", element!("p"), element!("button")), DEFAULT_DEPTH_LIMIT).unwrap();
	host.append_child(&container, instance.host_node());
	let div = *instance.host_node();
	let (p, button) = (*instance.child_instances()[0].host_node(), *instance.child_instances()[1].host_node());

	let next = element!("div", element!("p", "x"), element!("a", { "href" => "h" }));
	let instance = reconcile(&mut host, &container, Some(instance), Some(&next), DEFAULT_DEPTH_LIMIT).unwrap().unwrap();

	assert_eq!(*instance.host_node(), div);
	assert_eq!(*instance.child_instances()[0].host_node(), p);
	assert_eq!(host.text_content(p), "x");
	let a = *instance.child_instances()[1].host_node();
	assert_ne!(a, button);
	assert_eq!(host.children(div), [p, a]);
	assert_eq!(host.field(a, "href"), Some(&Value::from("h")));
	assert_eq!(instance.element(), &next);
}

#[test]
fn child_list_is_positional() {
	let mut host = MemoryHost::new();
	let parent = host.create_element("ul");
	let items = ["a", "b", "c"].iter().map(|&text| element!("li", text)).collect::<Vec<_>>();
	let instances = reconcile_children(&mut host, &parent, Vec::new(), &items, DEFAULT_DEPTH_LIMIT).unwrap();
	let nodes = instances.iter().map(|instance| *instance.host_node()).collect::<Vec<_>>();

	// Dropping the head shifts everything: The first two <li>s are patched, the last one removed.
	let instances = reconcile_children(&mut host, &parent, instances, &items[1..], DEFAULT_DEPTH_LIMIT).unwrap();
	assert_eq!(instances.len(), 2);
	assert_eq!(host.children(parent), &nodes[..2]);
	assert_eq!(host.inner_html(parent), "<li>b</li><li>c</li>");
	assert_eq!(host.parent(nodes[2]), None);
}

#[test]
fn absent_element_unmounts() {
	let (mut host, container, mut root) = setup();
	let on_click = Listener::new(|_| ());
	root.render(&mut host, element!("div", element!("button", { "onClick" => on_click.clone() }), element!("p"))).unwrap();
	let button = child(&host, container, &[0, 0]);
	assert_eq!(host.listener_count("click", &on_click), 1);

	root.render(&mut host, element!("div")).unwrap();
	assert!(host.children(child(&host, container, &[0])).is_empty());
	assert_eq!(host.parent(button), None);
	assert_eq!(host.registration_count(), 0);
	assert!(root.instance().unwrap().child_instances().is_empty());

}

#[test]
fn nothing_to_nothing_is_a_no_op() {
	let mut host = MemoryHost::new();
	let container = host.create_element("body");
	host.take_mutations();

	let instance = reconcile(&mut host, &container, None::<real_dom::Instance<NodeId>>, None, DEFAULT_DEPTH_LIMIT).unwrap();
	assert!(instance.is_none());
	assert!(host.mutations().is_empty());
}

#[test]
fn root_unmount_clears_container() {
	let (mut host, container, mut root) = setup();
	let on_click = Listener::new(|_| ());
	root.render(&mut host, element!("section", element!("button", { "onClick" => on_click }))).unwrap();
	root.unmount(&mut host);

	assert!(host.children(container).is_empty());
	assert!(root.instance().is_none());
	assert_eq!(host.registration_count(), 0);

	root.unmount(&mut host);
	root.render(&mut host, element!("section")).unwrap();
	assert_eq!(host.inner_html(container), "<section></section>");
}

#[test]
fn replacement_releases_old_listeners() {
	let (mut host, _, mut root) = setup();
	let old = Listener::new(|_| ());
	let new = Listener::new(|_| ());
	root.render(&mut host, element!("div", element!("button", { "onClick" => old.clone() }, element!("b", { "onMouseOver" => old })))).unwrap();
	root.render(&mut host, element!("div", element!("a", { "onClick" => new.clone() }))).unwrap();

	assert_eq!(host.listeners("click"), [new]);
	assert!(host.listeners("mouseover").is_empty());
}

#[test]
fn shared_listeners_are_counted() {
	let (mut host, _, mut root) = setup();
	let on_click = Listener::new(|_| ());
	let items = |count: usize| create_list(count, &on_click);

	root.render(&mut host, items(3)).unwrap();
	assert_eq!(host.listener_count("click", &on_click), 3);
	assert_eq!(host.listeners("click").len(), 1);

	root.render(&mut host, items(1)).unwrap();
	assert_eq!(host.listener_count("click", &on_click), 1);
	assert_eq!(host.dispatch("click", &()), 1);

	root.render(&mut host, items(0)).unwrap();
	assert_eq!(host.registration_count(), 0);
}

fn create_list(count: usize, on_click: &Listener) -> Element {
	let items = (0..count)
		.map(|i| element!("li", { "onClick" => on_click.clone() }, i))
		.map(real_dom::Child::from);
	real_dom::create_element("ul", PropertyBag::new(), items)
}

#[test]
fn identical_rerender_only_reassigns() {
	let (mut host, container, mut root) = setup();
	let on_click = Listener::new(|_| ());
	let tree = element!("div", { "id" => "container" }, element!("p", " count: ", 0), element!("button", { "onClick" => on_click }, "Click"));

	root.render(&mut host, tree.clone()).unwrap();
	let html = host.inner_html(container);
	host.take_mutations();

	root.render(&mut host, tree).unwrap();
	let mutations = host.take_mutations();
	assert!(!mutations.is_empty());
	assert!(mutations.iter().all(|mutation| matches!(mutation, Mutation::SetField { .. })));
	assert_eq!(host.inner_html(container), html);
	assert_eq!(host.registration_count(), 1);
}

#[test]
fn text_to_element_is_a_replacement() {
	let (mut host, container, mut root) = setup();
	root.render(&mut host, element!("p", "plain")).unwrap();
	let text = child(&host, container, &[0, 0]);
	root.render(&mut host, element!("p", element!("em", "plain"))).unwrap();

	assert_ne!(child(&host, container, &[0, 0]), text);
	assert_eq!(host.inner_html(container), "<p><em>plain</em></p>");
	assert!(host.take_mutations().iter().any(|mutation| matches!(mutation, Mutation::ReplaceChild { old, .. } if *old == text)));
}

#[test]
fn root_type_change_replaces_root() {
	let (mut host, container, mut root) = setup();
	root.render(&mut host, element!("div")).unwrap();
	root.render(&mut host, element!("main")).unwrap();
	assert_eq!(host.inner_html(container), "<main></main>");
	assert_eq!(host.children(container).len(), 1);
}

#[test]
fn invalid_children_fail_before_mutating() {
	let (mut host, container, mut root) = setup();
	root.render(&mut host, element!("ul", element!("li", "kept"))).unwrap();
	host.take_mutations();

	let mut props = PropertyBag::new();
	props.insert(CHILDREN, 3);
	let broken = element!("ul", element!("li", "changed"), Element::new("li", props));

	assert_eq!(
		root.render(&mut host, broken),
		Err(ValidationError::ChildrenNotSequence {
			tag: "li".to_owned(),
			found: "a number",
		})
	);
	assert!(host.mutations().is_empty());
	assert_eq!(host.inner_html(container), "<ul><li>kept</li></ul>");

	root.render(&mut host, element!("ul", element!("li", "changed"))).unwrap();
	assert_eq!(host.inner_html(container), "<ul><li>changed</li></ul>");
}

#[test]
fn instantiate_rejects_invalid_children() {
	let mut host = MemoryHost::new();
	let mut props = PropertyBag::new();
	props.insert(CHILDREN, "not a list");
	let broken = Element::new("div", props);

	assert!(matches!(
		instantiate(&mut host, &broken, DEFAULT_DEPTH_LIMIT),
		Err(ValidationError::ChildrenNotSequence { .. })
	));
}

#[test]
fn depth_limit() {
	let (mut host, _, root) = setup();
	let mut root = root.with_depth_limit(3);
	let nested = |levels: usize| (0..levels).fold(element!("i"), |inner, _| element!("b", inner));

	assert!(root.render(&mut host, nested(2)).is_ok());
	assert_eq!(
		root.render(&mut host, nested(3)),
		Err(ValidationError::DepthLimitExceeded { tag: "i".to_owned() })
	);
	assert!(matches!(
		instantiate(&mut host, &nested(3), 3),
		Err(ValidationError::DepthLimitExceeded { .. })
	));
}

#[test]
fn roots_are_independent() {
	let mut host = MemoryHost::new();
	let (left, right) = (host.create_element("aside"), host.create_element("main"));
	let mut left_root = Root::new(left);
	let mut right_root = Root::new(right);

	left_root.render(&mut host, element!("p", "left")).unwrap();
	right_root.render(&mut host, element!("p", "right")).unwrap();
	left_root.render(&mut host, element!("p", "left again")).unwrap();

	assert_eq!(host.inner_html(left), "<p>left again</p>");
	assert_eq!(host.inner_html(right), "<p>right</p>");
	assert_eq!(left_root.container(), &left);
}
