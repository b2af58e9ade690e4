use crate::common::FormError;

/// Transient notifications carried across a redirect as `?notice=<code>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    ProfileSaved,
    ContactSaved,
    AvatarUploaded,
    ShowCreated,
    ShowUpdated,
    ShowDeleted,
    PhotoUploaded,
    PhotoUpdated,
    PhotosDeleted,
    MissingFields,
    InvalidForm,
    NoFile,
    FileTooLarge,
    NoSelection,
    SaveFailed,
    UploadFailed,
    DeleteFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "notice-success",
            Self::Error => "notice-error",
        }
    }
}

impl Notice {
    const ALL: [Notice; 17] = [
        Self::ProfileSaved,
        Self::ContactSaved,
        Self::AvatarUploaded,
        Self::ShowCreated,
        Self::ShowUpdated,
        Self::ShowDeleted,
        Self::PhotoUploaded,
        Self::PhotoUpdated,
        Self::PhotosDeleted,
        Self::MissingFields,
        Self::InvalidForm,
        Self::NoFile,
        Self::FileTooLarge,
        Self::NoSelection,
        Self::SaveFailed,
        Self::UploadFailed,
        Self::DeleteFailed,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::ProfileSaved => "profile_saved",
            Self::ContactSaved => "contact_saved",
            Self::AvatarUploaded => "avatar_uploaded",
            Self::ShowCreated => "show_created",
            Self::ShowUpdated => "show_updated",
            Self::ShowDeleted => "show_deleted",
            Self::PhotoUploaded => "photo_uploaded",
            Self::PhotoUpdated => "photo_updated",
            Self::PhotosDeleted => "photos_deleted",
            Self::MissingFields => "missing",
            Self::InvalidForm => "invalid",
            Self::NoFile => "no_file",
            Self::FileTooLarge => "too_large",
            Self::NoSelection => "no_selection",
            Self::SaveFailed => "save_failed",
            Self::UploadFailed => "upload_failed",
            Self::DeleteFailed => "delete_failed",
        }
    }

    /// The notice shown when a submitted form is rejected.
    pub fn for_form_error(err: &FormError) -> Self {
        match err {
            FormError::MissingFields => Self::MissingFields,
            FormError::MissingFile => Self::NoFile,
            FormError::TooLarge(_) => Self::FileTooLarge,
            FormError::InvalidDate(_)
            | FormError::InvalidTime(_)
            | FormError::InvalidId(_)
            | FormError::Malformed(_) => Self::InvalidForm,
        }
    }

    pub fn parse(code: Option<&str>) -> Option<Self> {
        let code = code?.trim();
        Self::ALL.into_iter().find(|n| n.code() == code)
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::ProfileSaved
            | Self::ContactSaved
            | Self::AvatarUploaded
            | Self::ShowCreated
            | Self::ShowUpdated
            | Self::ShowDeleted
            | Self::PhotoUploaded
            | Self::PhotoUpdated
            | Self::PhotosDeleted => Severity::Success,
            _ => Severity::Error,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::ProfileSaved => "个人信息保存成功",
            Self::ContactSaved => "联系方式保存成功",
            Self::AvatarUploaded => "头像上传成功",
            Self::ShowCreated => "演出添加成功",
            Self::ShowUpdated => "演出更新成功",
            Self::ShowDeleted => "演出删除成功",
            Self::PhotoUploaded => "照片上传成功",
            Self::PhotoUpdated => "照片信息更新成功",
            Self::PhotosDeleted => "照片删除成功",
            Self::MissingFields => "请填写必填字段",
            Self::InvalidForm => "表单内容无效，请检查日期和时间",
            Self::NoFile => "请选择要上传的文件",
            Self::FileTooLarge => "文件过大",
            Self::NoSelection => "请先选择要删除的照片",
            Self::SaveFailed => "保存失败，请重试",
            Self::UploadFailed => "上传失败，请重试",
            Self::DeleteFailed => "删除失败，请重试",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_and_unknown_is_ignored() {
        for notice in Notice::ALL {
            assert_eq!(Notice::parse(Some(notice.code())), Some(notice));
        }
        assert_eq!(Notice::parse(Some("nope")), None);
        assert_eq!(Notice::parse(None), None);
        assert_eq!(Notice::ShowCreated.severity(), Severity::Success);
        assert_eq!(Notice::DeleteFailed.severity(), Severity::Error);
    }
}
