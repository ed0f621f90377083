//! YAML 标量样式
//!
//! serde_yaml 解析后 `2024-01-01` 与 `"2024-01-01"` 都只剩字符串。这里用 yaml-rust2 的事件解析器
//! 再读一遍头部，记录未加引号、未加标签的普通标量所在位置（JSON Pointer）。

use crate::error::{MifError, Result};
use std::collections::{HashMap, HashSet};
use yaml_rust2::parser::{Event, EventReceiver, Parser};
use yaml_rust2::scanner::TScalarStyle;

/// 普通标量位置集合，元素为 JSON Pointer（根为空串）
pub type ScalarPaths = HashSet<String>;

/// 在 `parent` 下追加一个 JSON Pointer 片段
pub fn pointer_child(parent: &str, token: &str) -> String {
    let escaped = token.replace('~', "~0").replace('/', "~1");
    format!("{parent}/{escaped}")
}

/// 收集 `text` 中所有普通标量的位置
///
/// 映射键本身不计入；作为键的集合节点，其内部也不计入。
/// 别名指向普通标量锚点时，别名所在位置同样计入。
pub fn plain_scalar_paths(text: &str) -> Result<ScalarPaths> {
    let mut collector = StyleCollector::default();
    Parser::new(text.chars())
        .load(&mut collector, false)
        .map_err(|e| MifError::Yaml(e.to_string()))?;
    Ok(collector.paths)
}

enum Frame {
    Mapping {
        path: Option<String>,
        /// `Some` 表示键已读到、等待值；内层 `None` 表示键不是字符串标量
        key: Option<Option<String>>,
    },
    Sequence {
        path: Option<String>,
        next: usize,
    },
}

enum Position {
    Key,
    Value(Option<String>),
}

#[derive(Default)]
struct StyleCollector {
    stack: Vec<Frame>,
    anchors: HashMap<usize, bool>,
    paths: ScalarPaths,
}

impl StyleCollector {
    /// 下一个节点的位置，同时推进所在集合的状态
    fn position(&mut self) -> Position {
        match self.stack.last_mut() {
            None => Position::Value(Some(String::new())),
            Some(Frame::Sequence { path, next }) => {
                let slot = path.as_deref().map(|p| pointer_child(p, &next.to_string()));
                *next += 1;
                Position::Value(slot)
            }
            Some(Frame::Mapping { path, key }) => match key.take() {
                None => Position::Key,
                Some(name) => Position::Value(
                    path.as_deref()
                        .zip(name.as_deref())
                        .map(|(p, name)| pointer_child(p, name)),
                ),
            },
        }
    }

    fn set_key(&mut self, name: Option<String>) {
        if let Some(Frame::Mapping { key, .. }) = self.stack.last_mut() {
            *key = Some(name);
        }
    }

    /// 集合开始：作为键的集合没有位置
    fn open(&mut self) -> Option<String> {
        match self.position() {
            Position::Key => {
                self.set_key(None);
                None
            }
            Position::Value(path) => path,
        }
    }
}

impl EventReceiver for StyleCollector {
    fn on_event(&mut self, event: Event) {
        match event {
            Event::Scalar(text, style, anchor, tag) => {
                let plain = matches!(style, TScalarStyle::Plain) && tag.is_none();
                if anchor > 0 {
                    self.anchors.insert(anchor, plain);
                }
                match self.position() {
                    Position::Key => self.set_key(Some(text)),
                    Position::Value(Some(path)) if plain => {
                        self.paths.insert(path);
                    }
                    Position::Value(_) => {}
                }
            }
            Event::Alias(anchor) => match self.position() {
                Position::Key => self.set_key(None),
                Position::Value(Some(path)) => {
                    if self.anchors.get(&anchor).copied().unwrap_or(false) {
                        self.paths.insert(path);
                    }
                }
                Position::Value(None) => {}
            },
            Event::MappingStart(..) => {
                let path = self.open();
                self.stack.push(Frame::Mapping { path, key: None });
            }
            Event::SequenceStart(..) => {
                let path = self.open();
                self.stack.push(Frame::Sequence { path, next: 0 });
            }
            Event::MappingEnd | Event::SequenceEnd => {
                self.stack.pop();
            }
            _ => {}
        }
    }
}
