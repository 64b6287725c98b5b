//! Common test utilities: DSL fixtures and document builders.
use dify_dsl::prelude::*;
use serde_json::json;

/// The smallest document the parser accepts.
#[allow(dead_code)]
pub const MINIMAL_YAML: &str = r#"
app:
  name: M
  mode: workflow
kind: app
version: 0.2.0
workflow:
  graph:
    nodes: []
    edges: []
"#;

/// A chat app as exported by the editor: every built-in node kind except `end`, float
/// positions, handles on edges, a select input and a few features.
#[allow(dead_code)]
pub const CHAT_APP_YAML: &str = r#"
app:
  description: Answers questions about the weather
  icon: "☀️"
  icon_background: '#E0F2FE'
  mode: advanced-chat
  name: Weather Bot
  use_icon_as_answer_icon: true
dependencies: []
kind: app
version: 0.1.5
workflow:
  conversation_variables:
  - description: ''
    id: 5a6d3c4e
    name: last_city
    value: ''
    value_type: string
  environment_variables:
  - variable: API_KEY
    label: API_KEY
    type: secret
    required: false
  features:
    file_upload:
      enabled: false
    opening_statement: Ask me about the weather anywhere.
    suggested_questions: []
  graph:
    edges:
    - data:
        sourceType: start
        targetType: llm
      id: start-source-llm-target
      source: start
      sourceHandle: source
      target: llm
      targetHandle: target
      type: custom
      zIndex: 0
    - id: llm-tool
      source: llm
      target: weather
      type: custom
    - id: weather-code
      source: weather
      target: format
      type: custom
    - id: format-answer
      source: format
      target: answer
      type: custom
    nodes:
    - data:
        desc: ''
        selected: false
        title: Start
        type: start
        variables:
        - label: City
          max_length: 48
          options: []
          required: true
          type: text-input
          variable: city
        - label: Units
          options:
          - metric
          - imperial
          required: false
          type: select
          variable: units
          default: metric
      height: 116
      id: start
      position:
        x: 80
        y: 282
      positionAbsolute:
        x: 80
        y: 282
      selected: false
      sourcePosition: right
      targetPosition: left
      type: custom
      width: 244
    - data:
        context:
          enabled: false
          variable_selector: []
        desc: Extracts the city
        model:
          completion_params:
            temperature: 0.2
          mode: chat
          name: gpt-4o-mini
          provider: openai
        prompt_template:
        - id: sys-1
          role: system
          text: Extract the city name.
        - role: user
          text: '{{#sys.query#}}'
        selected: false
        title: Extract
        type: llm
        vision:
          enabled: false
      id: llm
      position:
        x: 384.5
        y: 282
      type: custom
    - data:
        desc: ''
        provider_id: weather
        provider_name: weather
        provider_type: builtin
        selected: false
        title: Current weather
        tool_name: current
        tool_parameters:
          city:
            type: mixed
            value: '{{#llm.text#}}'
        param_schemas:
        - name: city
          required: true
        type: tool
      id: weather
      position:
        x: 688
        y: 282
      type: custom
    - data:
        code: |
          def main(raw: str) -> dict:
              return {"result": raw.upper()}
        code_language: python3
        desc: ''
        outputs:
          result:
            type: string
            children: null
        selected: false
        title: Format
        type: code
        variables:
        - value_selector:
          - weather
          - text
          variable: raw
      id: format
      position:
        x: 992
        y: 282
      type: custom
    - data:
        answer: '{{#format.result#}}'
        desc: ''
        selected: false
        title: Reply
        type: answer
        variables: []
      id: answer
      position:
        x: 1296
        y: 282
      type: custom
"#;

/// A document whose graph uses a node type only known once a parser is registered.
#[allow(dead_code)]
pub const IF_ELSE_YAML: &str = r#"
app: {name: Router, mode: workflow}
kind: app
version: 0.3.0
workflow:
  graph:
    nodes:
    - id: start
      type: custom
      position: {x: 0, y: 0}
      data: {type: start, title: Start, desc: '', selected: false}
    - id: branch
      type: custom
      position: {x: 300, y: 0}
      data:
        type: if-else
        title: Branch
        desc: ''
        selected: false
        logical_operator: and
        conditions:
        - variable_selector: [start, flag]
          comparison_operator: is
          value: 'true'
    - id: end
      type: custom
      position: {x: 600, y: 0}
      data: {type: end, title: End, desc: '', selected: false, outputs: []}
    edges:
    - {id: start-branch, source: start, target: branch, type: custom}
    - {id: branch-end, source: branch, target: end, type: custom, sourceHandle: 'true'}
"#;

/// A valid document tree; tests mutate it to trigger specific parse failures.
#[allow(dead_code)]
pub fn minimal_tree() -> Value {
    json!({
        "app": {"name": "M", "mode": "workflow"},
        "kind": "app",
        "version": "0.2.0",
        "workflow": {"graph": {"nodes": [], "edges": []}}
    })
}

/// Like [`minimal_tree`], with the given node and edge entries.
#[allow(dead_code)]
pub fn tree_with_graph(nodes: Value, edges: Value) -> Value {
    let mut tree = minimal_tree();
    tree["workflow"]["graph"] = json!({"nodes": nodes, "edges": edges});
    tree
}

/// A node envelope as the editor writes it.
#[allow(dead_code)]
pub fn node_tree(id: &str, node_type: &str, data: Value) -> Value {
    let mut full = json!({"type": node_type, "title": id, "desc": "", "selected": false});
    if let (Some(full), Value::Object(extra)) = (full.as_object_mut(), data) {
        full.extend(extra);
    }
    json!({
        "id": id,
        "type": "custom",
        "position": {"x": 0, "y": 0},
        "data": full,
    })
}

/// Parses a tree with the default registry and returns the error message.
#[allow(dead_code)]
pub fn parse_error(tree: &Value) -> String {
    DslParser::new()
        .parse_value(tree)
        .expect_err("document should be rejected")
        .to_string()
}

/// Start -> LLM -> Tool -> End, built through the fluent API.
#[allow(dead_code)]
pub fn build_linear_app() -> App {
    WorkflowBuilder::new()
        .name("Linear")
        .description("start to end")
        .start_node(|start| {
            start.add_input("query", "text-input", true, Some("Query"));
        })
        .llm_node(Some("llm1"), |llm| {
            llm.set_model("gpt-4o", "openai", "chat", Tree::new())
                .set_system_prompt("You are helpful.")
                .set_user_prompt("{{#start.query#}}");
        })
        .tool_node(Some("tool1"), |tool| {
            tool.set_provider("google", "google", "builtin")
                .set_tool("google_search", "", "Search the web")
                .add_parameter("query", "{{#llm1.text#}}")
                .enable_retry(3, 1000);
        })
        .end_node(|end| {
            end.add_output("result", ["tool1", "text"]);
        })
        .build()
}

/// Builds a graph node by node with the given ids and node types.
#[allow(dead_code)]
pub fn graph_of(nodes: &[(&str, &str)]) -> Graph {
    let mut graph = Graph::new();
    for (id, node_type) in nodes {
        let node: Node = match *node_type {
            "start" => StartNode::new(*id).into(),
            "end" => EndNode::new(*id).into(),
            "answer" => AnswerNode::new(*id).into(),
            "llm" => LlmNode::new(*id).into(),
            "tool" => ToolNode::new(*id).into(),
            "code" => CodeNode::new(*id).into(),
            other => CustomNode::new(*id, other).into(),
        };
        graph.add_node(node);
    }
    graph
}
