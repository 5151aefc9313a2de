//! 针对 `serde_json::Value` 的全量防御性访问辅助。
//!
//! 上游返回的是形状完全不受约束的 JSON 树，任何字段都可能缺失或类型不对。
//! 规整步骤一律通过这里的访问器取值：取不到就得到 `None`，绝不 panic，
//! 也绝不因结构缺失而返回错误。

use serde_json::{Map, Value};

/// `serde_json::Value` 的防御性取值扩展。
pub trait ValueExt {
    /// 按路径逐层取值，任何一层缺失或类型不符都返回 `None`。
    fn get_path(&self, path: &[&str]) -> Option<&Value>;

    /// 取 `key` 对应的字符串。
    fn str_at(&self, key: &str) -> Option<&str>;

    /// 取 `key` 对应的数组。
    fn arr_at(&self, key: &str) -> Option<&Vec<Value>>;

    /// 取 `key` 对应的对象。
    fn obj_at(&self, key: &str) -> Option<&Map<String, Value>>;
}

impl ValueExt for Value {
    fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let mut current = self;
        for key in path {
            current = current.get(key)?;
        }
        Some(current)
    }

    fn str_at(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn arr_at(&self, key: &str) -> Option<&Vec<Value>> {
        self.get(key).and_then(Value::as_array)
    }

    fn obj_at(&self, key: &str) -> Option<&Map<String, Value>> {
        self.get(key).and_then(Value::as_object)
    }
}

/// 把 `from` 键改名为 `to`。
///
/// 目标键已经有值时整个改名被跳过，绝不覆盖已有字段；
/// 改名成功后原键被移除，调用方不会同时看到新旧两份。
pub fn rename_key(obj: &mut Map<String, Value>, from: &str, to: &str) {
    if obj.contains_key(to) {
        return;
    }
    if let Some(value) = obj.remove(from) {
        obj.insert(to.to_string(), value);
    }
}

/// 批量移除若干键，键不存在时忽略。
pub fn remove_keys(obj: &mut Map<String, Value>, keys: &[&str]) {
    for key in keys {
        obj.remove(*key);
    }
}
