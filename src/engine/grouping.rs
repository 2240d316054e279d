// ==========================================
// 纺织厂库存报表系统 - 分组汇总原语
// ==========================================
// 职责: 按派生键分组并累加数量（保持首次出现顺序）
// 红线: 只做分组累加，不解析字段（数量在导入层已解析）
// ==========================================

use std::collections::HashMap;
use std::hash::Hash;
use std::ops::AddAssign;

// ==========================================
// Group - 单个分组
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct Group<T, Q> {
    pub items: Vec<T>,
    pub tally: Q,
}

// ==========================================
// Grouped - 分组结果（按键首次出现顺序）
// ==========================================
#[derive(Debug, Clone)]
pub struct Grouped<K, T, Q> {
    index: HashMap<K, usize>,
    entries: Vec<(K, Group<T, Q>)>,
    skipped: usize,
}

impl<K, T, Q> Default for Grouped<K, T, Q> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
            skipped: 0,
        }
    }
}

impl<K, T, Q> Grouped<K, T, Q>
where
    K: Eq + Hash + Clone,
    Q: Default + Copy + AddAssign,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// 放入一条记录
    pub fn push(&mut self, key: K, item: T, tally: Q) {
        let slot = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((
                    key,
                    Group {
                        items: Vec::new(),
                        tally: Q::default(),
                    },
                ));
                self.entries.len() - 1
            }
        };
        let group = &mut self.entries[slot].1;
        group.items.push(item);
        group.tally += tally;
    }

    pub fn get(&self, key: &K) -> Option<&Group<T, Q>> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// 指定键的合计，缺失时为默认值
    pub fn tally_of(&self, key: &K) -> Q {
        self.get(key).map(|g| g.tally).unwrap_or_default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &Group<T, Q>)> {
        self.entries.iter().map(|(k, g)| (k, g))
    }

    /// 所有分组合计之和
    pub fn total(&self) -> Q {
        let mut total = Q::default();
        for (_, group) in &self.entries {
            total += group.tally;
        }
        total
    }

    /// 因无法派生键而跳过的记录数
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<(K, Group<T, Q>)> {
        self.entries
    }
}

/// 按键分组并累加
///
/// # 参数
/// - `records`: 待分组记录
/// - `key_of`: 分组键
/// - `tally_of`: 单条记录的数量
pub fn group_and_sum<I, T, K, Q, FK, FQ>(records: I, key_of: FK, tally_of: FQ) -> Grouped<K, T, Q>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash + Clone,
    Q: Default + Copy + AddAssign,
    FK: Fn(&T) -> K,
    FQ: Fn(&T) -> Q,
{
    let mut grouped = Grouped::new();
    for record in records {
        let key = key_of(&record);
        let tally = tally_of(&record);
        grouped.push(key, record, tally);
    }
    grouped
}

/// 同 [`group_and_sum`]，键派生失败的记录被跳过并计数
pub fn try_group_and_sum<I, T, K, Q, FK, FQ>(
    records: I,
    key_of: FK,
    tally_of: FQ,
) -> Grouped<K, T, Q>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash + Clone,
    Q: Default + Copy + AddAssign,
    FK: Fn(&T) -> Option<K>,
    FQ: Fn(&T) -> Q,
{
    let mut grouped = Grouped::new();
    for record in records {
        match key_of(&record) {
            Some(key) => {
                let tally = tally_of(&record);
                grouped.push(key, record, tally);
            }
            None => grouped.skipped += 1,
        }
    }
    grouped
}
