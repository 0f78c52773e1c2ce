// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Duration;

use qtrace_core::{
	ResourceUsage,
	interface::{Instrumentation, PlanNode},
};

/// Plan tree node for tests, built fluently:
///
/// ```
/// use qtrace_core::interface::PlanNode;
/// use qtrace_testing::TestNode;
///
/// let plan = TestNode::leaf("HashJoin")
/// 	.with_child(TestNode::leaf("SeqScan").instrumented(1, 1000, 0.1, 4.2))
/// 	.with_child(TestNode::leaf("IndexScan").instrumented(1, 10, 0.0, 0.3));
/// assert_eq!(plan.tag(), "HashJoin");
/// assert_eq!(plan.children().len(), 2);
/// ```
pub struct TestNode {
	tag: String,
	instrumentation: Option<Instrumentation>,
	children: Vec<TestNode>,
}

impl TestNode {
	pub fn leaf(tag: &str) -> Self {
		Self {
			tag: tag.to_string(),
			instrumentation: None,
			children: Vec::new(),
		}
	}

	pub fn with_child(mut self, child: TestNode) -> Self {
		self.children.push(child);
		self
	}

	pub fn with_instrumentation(mut self, instrumentation: Instrumentation) -> Self {
		self.instrumentation = Some(instrumentation);
		self
	}

	/// Shorthand for a node that ran: loop count, total rows, and
	/// startup/total times in milliseconds.
	pub fn instrumented(self, loops: u64, rows_total: u64, startup_ms: f64, total_ms: f64) -> Self {
		self.with_instrumentation(Instrumentation {
			loops,
			rows_total,
			startup: Duration::from_secs_f64(startup_ms / 1000.0),
			total: Duration::from_secs_f64(total_ms / 1000.0),
			resource_usage: None,
		})
	}

	pub fn with_resource_usage(mut self, usage: ResourceUsage) -> Self {
		let instrumentation = self.instrumentation.get_or_insert_with(|| Instrumentation {
			loops: 1,
			..Default::default()
		});
		instrumentation.resource_usage = Some(usage);
		self
	}
}

impl PlanNode for TestNode {
	fn tag(&self) -> &str {
		&self.tag
	}

	fn instrumentation(&self) -> Option<&Instrumentation> {
		self.instrumentation.as_ref()
	}

	fn children(&self) -> Vec<&dyn PlanNode> {
		self.children.iter().map(|child| child as &dyn PlanNode).collect()
	}
}
