use crate::api::attendance::{CheckInRequest, UpdateAttendance};
use crate::api::employee::{CreateEmployee, UpdateEmployee};
use crate::api::user::UserRequest;
use crate::model::attendance::{
    Attendance, AttendanceListRow, AttendanceStatus, AttendanceSummaryRow,
};
use crate::model::employee::Employee;
use crate::model::user::User;
use crate::models::{LoginReqDto, LoginResponse, LoginUser, RegisterReqDto};
use crate::query::PageMeta;
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Attendance API",
        version = "1.0.0",
        description = r#"
## HR Attendance Service

REST API for HR staff to manage employees and their daily check-ins.

### Key Features
- **Employees**: create, update, search and list with `field[op]` filters, sorting, projection and paging
- **Attendance**: one check-in per employee per day (re-posting replaces the time), filtered lists and a present/absent roster
- **Reports**: monthly days-present and late-arrival counts (late = after 09:45)

### Security
Everything under `/api` except `/api/health` needs `Authorization: Bearer <token>` from `/auth/login`.

### Response Format
`{ "success": bool, "message": string, "data"?: ..., "meta"?: { page, limit, total, totalPage } }`
"#,
    ),
    paths(
        crate::routes::health,

        crate::auth::handlers::login,
        crate::auth::handlers::register,

        crate::api::user::create_user,
        crate::api::user::list_users,
        crate::api::user::get_user,
        crate::api::user::update_user,
        crate::api::user::delete_user,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::search_employees,
        crate::api::employee::employees_by_designation,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::check_in,
        crate::api::attendance::list_attendance,
        crate::api::attendance::list_attendance_on,
        crate::api::attendance::attendance_by_date,
        crate::api::attendance::attendance_report,
        crate::api::attendance::employee_attendance,
        crate::api::attendance::get_attendance,
        crate::api::attendance::update_attendance,
        crate::api::attendance::delete_attendance,

        crate::api::report::monthly_attendance
    ),
    components(
        schemas(
            LoginReqDto,
            RegisterReqDto,
            LoginResponse,
            LoginUser,
            User,
            UserRequest,
            Employee,
            CreateEmployee,
            UpdateEmployee,
            PageMeta,
            Attendance,
            AttendanceListRow,
            AttendanceStatus,
            AttendanceSummaryRow,
            CheckInRequest,
            UpdateAttendance
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Auth", description = "Login and registration"),
        (name = "User", description = "HR user management APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Report", description = "Attendance reports"),
    )
)]
pub struct ApiDoc;
