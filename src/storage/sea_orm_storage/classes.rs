//! 班级存储操作

use super::{SeaOrmStorage, map_write_error};
use crate::entity::class_students::{
    ActiveModel as ClassStudentActiveModel, Column as ClassStudentColumn,
    Entity as ClassStudents,
};
use crate::entity::classes::{ActiveModel, Column, Entity as Classes, Model as ClassModel};
use crate::errors::{ClassroomError, Result};
use crate::models::classes::{entities::Class, requests::NewClass, responses::ClassListItem};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建班级
    pub async fn create_class_impl(&self, req: NewClass) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            teacher_id: Set(req.teacher_id),
            name: Set(req.name),
            description: Set(req.description),
            class_code: Set(req.class_code),
            join_link: Set(req.join_link),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, "创建班级失败", "班级码已存在"))?;

        Ok(result.into_class())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 通过班级码获取班级
    pub async fn get_class_by_code_impl(&self, class_code: &str) -> Result<Option<Class>> {
        let result = Classes::find()
            .filter(Column::ClassCode.eq(class_code))
            .one(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 列出教师创建的班级
    pub async fn list_teacher_classes_impl(&self, teacher_id: i64) -> Result<Vec<ClassListItem>> {
        let classes = Classes::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询班级列表失败: {e}")))?;

        self.with_student_counts(classes).await
    }

    /// 列出学生加入的班级
    pub async fn list_student_classes_impl(&self, student_id: i64) -> Result<Vec<ClassListItem>> {
        let class_ids: Vec<i64> = ClassStudents::find()
            .select_only()
            .column(ClassStudentColumn::ClassId)
            .filter(ClassStudentColumn::StudentId.eq(student_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询学生班级失败: {e}")))?;

        if class_ids.is_empty() {
            return Ok(Vec::new());
        }

        let classes = Classes::find()
            .filter(Column::Id.is_in(class_ids))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询班级列表失败: {e}")))?;

        self.with_student_counts(classes).await
    }

    /// 加入班级
    pub async fn join_class_impl(&self, class_id: i64, student_id: i64) -> Result<()> {
        if self.is_class_student_impl(class_id, student_id).await? {
            return Err(ClassroomError::conflict("已加入该班级"));
        }

        let model = ClassStudentActiveModel {
            class_id: Set(class_id),
            student_id: Set(student_id),
            joined_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        // 并发加入时由唯一索引兜底
        model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, "加入班级失败", "已加入该班级"))?;

        Ok(())
    }

    /// 学生是否在班级中
    pub async fn is_class_student_impl(&self, class_id: i64, student_id: i64) -> Result<bool> {
        let count = ClassStudents::find()
            .filter(
                Condition::all()
                    .add(ClassStudentColumn::ClassId.eq(class_id))
                    .add(ClassStudentColumn::StudentId.eq(student_id)),
            )
            .count(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询班级成员失败: {e}")))?;

        Ok(count > 0)
    }

    /// 获取班级学生数量
    async fn count_class_students(&self, class_id: i64) -> Result<i64> {
        let count = ClassStudents::find()
            .filter(ClassStudentColumn::ClassId.eq(class_id))
            .count(&self.db)
            .await
            .map_err(|e| ClassroomError::database_operation(format!("查询班级人数失败: {e}")))?;

        Ok(count as i64)
    }

    async fn with_student_counts(&self, classes: Vec<ClassModel>) -> Result<Vec<ClassListItem>> {
        let mut items = Vec::with_capacity(classes.len());
        for model in classes {
            let student_count = self.count_class_students(model.id).await?;
            items.push(ClassListItem {
                class: model.into_class(),
                student_count,
            });
        }
        Ok(items)
    }
}
