use crate::api::attendance::{StatusResponse, ToggleRequest, ToggleResponse};
use crate::api::activity::CreateActivity;
use crate::api::block::{BlockListResponse, BlockWithRooms, CreateBlock, RoomWithStudents};
use crate::api::login::LoginRequest;
use crate::api::room::CreateRoom;
use crate::api::student::{CreateStudent, StudentProfileResponse};
use crate::model::activity::ClubActivity;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::block::Block;
use crate::model::room::Room;
use crate::model::student::Student;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hostel Management API",
        version = "1.0.0",
        description = r#"
## Hostel Management Backend

Tracks hostel blocks, rooms, students, and club activities, and keeps a
per-day attendance log driven by a single Check In / Check Out toggle.

### Attendance model
- One record per student per calendar day, created lazily on the first
  toggle or backfilled as **Absent** by the nightly sweep (23:59 hostel time).
- Toggling alternates Checked In / Checked Out within the day; checking in
  always overrides a swept absence.

### Response format
JSON envelopes with a `success` flag, matching the admin and student
dashboards.
"#,
    ),
    paths(
        crate::api::attendance::toggle_attendance,
        crate::api::attendance::attendance_status,
        crate::api::attendance::run_sweep,

        crate::api::block::list_blocks,
        crate::api::block::create_block,
        crate::api::block::delete_block,

        crate::api::room::create_room,
        crate::api::room::delete_room,

        crate::api::student::create_student,
        crate::api::student::student_profile,
        crate::api::student::delete_student,

        crate::api::activity::list_activities,
        crate::api::activity::create_activity,
        crate::api::activity::delete_activity,

        crate::api::login::login,
    ),
    components(
        schemas(
            ToggleRequest,
            ToggleResponse,
            StatusResponse,
            AttendanceRecord,
            AttendanceStatus,
            CreateBlock,
            Block,
            BlockWithRooms,
            BlockListResponse,
            RoomWithStudents,
            CreateRoom,
            Room,
            CreateStudent,
            Student,
            StudentProfileResponse,
            CreateActivity,
            ClubActivity,
            LoginRequest,
        )
    ),
    tags(
        (name = "Attendance", description = "Daily check-in/check-out tracking"),
        (name = "Blocks", description = "Hostel block management"),
        (name = "Rooms", description = "Room management"),
        (name = "Students", description = "Student management"),
        (name = "Activities", description = "Club activity management"),
        (name = "Auth", description = "Dashboard login"),
    )
)]
pub struct ApiDoc;
