// ==========================================
// 互访评估系统 - 访问排程领域模型
// ==========================================
// 职责: 排程草稿（编辑中）与排程条目（已保存）
// 红线: 每个日期仅一条排程；同一条目内机构不可重复
// ==========================================

use crate::domain::types::Facility;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 访问小组固定槽位数
pub const TEAM_SLOTS: usize = 5;

/// 槽位数组
pub type TeamSlots = [Option<Facility>; TEAM_SLOTS];

// ==========================================
// ScheduleError - 排程构造错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("槽位越界: index={index}, 槽位数={slots}")]
    SlotOutOfRange { index: usize, slots: usize },

    #[error("槽位数量超出上限: {0}")]
    TooManySlots(usize),

    #[error("同一天内机构重复: {0}")]
    DuplicateVisitor(Facility),

    #[error("日期格式错误: {0}")]
    InvalidDate(String),
}

// ==========================================
// ScheduleDraft - 排程草稿
// ==========================================
/// 编辑中的排程（主办机构可能尚未选择）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDraft {
    pub date: NaiveDate,
    pub host: Option<Facility>,
    pub slots: TeamSlots,
}

impl ScheduleDraft {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            host: None,
            slots: [None; TEAM_SLOTS],
        }
    }

    pub fn with_host(mut self, host: Facility) -> Self {
        self.host = Some(host);
        self
    }

    /// 按顺序填充槽位（多余的忽略）
    pub fn with_visitors(mut self, visitors: &[Facility]) -> Self {
        for (slot, facility) in self.slots.iter_mut().zip(visitors.iter()) {
            *slot = Some(*facility);
        }
        self
    }

    /// 设置/清空单个槽位
    pub fn set_slot(&mut self, index: usize, facility: Option<Facility>) -> Result<(), ScheduleError> {
        let slot = self.slots.get_mut(index).ok_or(ScheduleError::SlotOutOfRange {
            index,
            slots: TEAM_SLOTS,
        })?;
        *slot = facility;
        Ok(())
    }

    /// 非空槽位
    pub fn visitors(&self) -> impl Iterator<Item = Facility> + '_ {
        self.slots.iter().flatten().copied()
    }

    pub fn team_size(&self) -> usize {
        self.visitors().count()
    }
}

impl From<&ScheduleEntry> for ScheduleDraft {
    fn from(entry: &ScheduleEntry) -> Self {
        Self {
            date: entry.date,
            host: Some(entry.host),
            slots: entry.slots,
        }
    }
}

// ==========================================
// ScheduleEntry - 排程条目
// ==========================================
/// 已保存的排程（按日期唯一，重新保存即整体替换）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleWire", into = "ScheduleWire")]
pub struct ScheduleEntry {
    date: NaiveDate,
    host: Facility,
    slots: TeamSlots,
}

impl ScheduleEntry {
    /// 构造排程条目，拒绝同日重复机构
    pub fn new(date: NaiveDate, host: Facility, slots: TeamSlots) -> Result<Self, ScheduleError> {
        let mut seen: Vec<Facility> = Vec::with_capacity(TEAM_SLOTS);
        for facility in slots.iter().flatten() {
            if seen.contains(facility) {
                return Err(ScheduleError::DuplicateVisitor(*facility));
            }
            seen.push(*facility);
        }
        Ok(Self { date, host, slots })
    }

    /// 记录ID（即日期字符串）
    pub fn id(&self) -> String {
        self.date.format(crate::domain::wire_date::DATE_FORMAT).to_string()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn host(&self) -> Facility {
        self.host
    }

    pub fn slots(&self) -> &TeamSlots {
        &self.slots
    }

    pub fn visitors(&self) -> impl Iterator<Item = Facility> + '_ {
        self.slots.iter().flatten().copied()
    }

    pub fn team_size(&self) -> usize {
        self.visitors().count()
    }

    pub fn includes_visitor(&self, facility: Facility) -> bool {
        self.slots.contains(&Some(facility))
    }
}

// ==========================================
// 线上格式
// ==========================================
// { id, date, hostHospital, hospitals: [facility|null; 5] }
/// 排程线上格式（仅用于序列化）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleWire {
    #[serde(default)]
    id: String,
    date: String,
    host_hospital: Facility,
    #[serde(default)]
    hospitals: Vec<Option<Facility>>,
}

impl TryFrom<ScheduleWire> for ScheduleEntry {
    type Error = ScheduleError;

    fn try_from(wire: ScheduleWire) -> Result<Self, Self::Error> {
        let date = crate::domain::wire_date::parse(&wire.date)
            .map_err(|_| ScheduleError::InvalidDate(wire.date.clone()))?;
        if wire.hospitals.len() > TEAM_SLOTS {
            return Err(ScheduleError::TooManySlots(wire.hospitals.len()));
        }
        // 旧数据槽位不足时补空
        let mut slots: TeamSlots = [None; TEAM_SLOTS];
        for (slot, facility) in slots.iter_mut().zip(wire.hospitals) {
            *slot = facility;
        }
        ScheduleEntry::new(date, wire.host_hospital, slots)
    }
}

impl From<ScheduleEntry> for ScheduleWire {
    fn from(entry: ScheduleEntry) -> Self {
        let id = entry.id();
        Self {
            date: id.clone(),
            id,
            host_hospital: entry.host,
            hospitals: entry.slots.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_entry_rejects_duplicate_visitor() {
        let slots = [Some(Facility::SapYai), Some(Facility::SapYai), None, None, None];
        assert_eq!(
            ScheduleEntry::new(d(2025, 2, 1), Facility::KhonSan, slots),
            Err(ScheduleError::DuplicateVisitor(Facility::SapYai))
        );
    }

    #[test]
    fn test_entry_wire_shape() {
        let slots = [Some(Facility::SapYai), None, Some(Facility::Chaiyaphum), None, None];
        let entry = ScheduleEntry::new(d(2025, 2, 1), Facility::KhonSan, slots).unwrap();
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["id"], "2025-02-01");
        assert_eq!(value["date"], "2025-02-01");
        assert_eq!(value["hostHospital"], "รพ.คอนสาร");
        assert_eq!(value["hospitals"].as_array().unwrap().len(), TEAM_SLOTS);
        assert!(value["hospitals"][1].is_null());
        assert_eq!(value["hospitals"][2], "รพ.ชัยภูมิ");
    }

    #[test]
    fn test_entry_from_short_wire_is_padded() {
        let json = r#"{"id":"2025-02-01","date":"2025-02-01","hostHospital":"รพ.คอนสาร","hospitals":["รพ.ซับใหญ่"]}"#;
        let entry: ScheduleEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.slots()[0], Some(Facility::SapYai));
        assert_eq!(entry.slots()[4], None);
        assert_eq!(entry.team_size(), 1);
    }

    #[test]
    fn test_entry_from_wire_rejects_bad_rows() {
        let too_many = r#"{"date":"2025-02-01","hostHospital":"รพ.คอนสาร","hospitals":[null,null,null,null,null,null]}"#;
        assert!(serde_json::from_str::<ScheduleEntry>(too_many).is_err());
        let bad_date = r#"{"date":"01/02/2025","hostHospital":"รพ.คอนสาร","hospitals":[]}"#;
        assert!(serde_json::from_str::<ScheduleEntry>(bad_date).is_err());
    }

    #[test]
    fn test_draft_slot_bounds() {
        let mut draft = ScheduleDraft::new(d(2025, 2, 1));
        assert!(draft.set_slot(4, Some(Facility::BanThaen)).is_ok());
        assert_eq!(
            draft.set_slot(5, Some(Facility::BanThaen)),
            Err(ScheduleError::SlotOutOfRange { index: 5, slots: TEAM_SLOTS })
        );
        assert_eq!(draft.team_size(), 1);
    }
}
