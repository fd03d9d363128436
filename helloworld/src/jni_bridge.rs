/*!
    JNI entry points for `com.example.helloworldffmpeg.HelloWorldFFmpeg`.
*/

use jni::JNIEnv;
use jni::objects::{JObject, JString};
use jni::sys::{jint, jstring};
use tracing::{error, info};

use ffmpeg_types::GENERIC_FAILURE;

/**
    Description returned by `getFFmpegVersion`.
*/
pub const VERSION_STRING: &str = "FFmpeg (ffmpeg-next 8) via helloworld-ffmpeg";

fn path_argument(env: &mut JNIEnv, path: &JString) -> Option<String> {
    if path.is_null() {
        error!("output path is null");
        return None;
    }
    match env.get_string(path) {
        Ok(path) => Some(path.into()),
        Err(e) => {
            error!("failed to read output path: {e}");
            None
        }
    }
}

fn report(test: &str, status: i32) -> jint {
    if status == 0 {
        info!("✅ {test} succeeded");
    } else {
        error!("❌ {test} failed with code: {status}");
    }
    status
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_helloworldffmpeg_HelloWorldFFmpeg_nativeAPITest<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    output_path: JString<'local>,
) -> jint {
    let Some(path) = path_argument(&mut env, &output_path) else {
        return GENERIC_FAILURE;
    };
    info!(path = %path, "starting native API test");
    report("Native API test", crate::run_native(&path))
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_helloworldffmpeg_HelloWorldFFmpeg_embeddedCLITest<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    output_path: JString<'local>,
) -> jint {
    let Some(path) = path_argument(&mut env, &output_path) else {
        return GENERIC_FAILURE;
    };
    info!(path = %path, "starting embedded CLI test");
    report("Embedded CLI test", crate::run_cli(&path))
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_helloworldffmpeg_HelloWorldFFmpeg_getFFmpegVersion<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jstring {
    match env.new_string(VERSION_STRING) {
        Ok(version) => version.into_raw(),
        Err(e) => {
            error!("failed to create version string: {e}");
            std::ptr::null_mut()
        }
    }
}
